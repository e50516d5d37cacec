use flux_ipc::{ActionId, HistoryDirection, StateEvent};

use crate::core::{opacity, Config, WindowStateController};
use crate::effect::Effect;
use crate::error::CoreError;
use crate::platform::WindowHandle;

pub const VIDEO_TOGGLE_SCRIPT: &str =
    "var v = document.querySelector('video'); if (v) { v.paused ? v.play() : v.pause(); }";
pub const VIDEO_FORWARD_SCRIPT: &str =
    "var v = document.querySelector('video'); if (v) { v.currentTime += 10; }";
pub const VIDEO_BACKWARD_SCRIPT: &str =
    "var v = document.querySelector('video'); if (v) { v.currentTime -= 10; }";

/// Apply `action` to the window and return whatever must happen outside it.
pub fn run_action<W: WindowHandle>(
    action: ActionId,
    controller: &mut WindowStateController<W>,
    config: &Config,
) -> Result<Vec<Effect>, CoreError> {
    tracing::debug!("Running action {}", action);
    let effects = match action {
        ActionId::BossKey => {
            controller.toggle_visibility();
            vec![]
        }
        ActionId::ImmersionMode => {
            let immersive = !controller.state().is_immersive;
            if controller.set_immersive(immersive) {
                vec![Effect::Broadcast(StateEvent::ImmersionChanged { immersive })]
            } else {
                vec![]
            }
        }
        ActionId::OpacityUp => adjust_opacity(controller, config.opacity.step, config)?,
        ActionId::OpacityDown => adjust_opacity(controller, -config.opacity.step, config)?,
        ActionId::VideoPause => vec![Effect::ExecuteScript(VIDEO_TOGGLE_SCRIPT.to_string())],
        ActionId::VideoForward => vec![Effect::ExecuteScript(VIDEO_FORWARD_SCRIPT.to_string())],
        ActionId::VideoBackward => {
            vec![Effect::ExecuteScript(VIDEO_BACKWARD_SCRIPT.to_string())]
        }
        ActionId::GoBack => navigate(controller, HistoryDirection::Back),
        ActionId::GoForward => navigate(controller, HistoryDirection::Forward),
    };
    Ok(effects)
}

/// Shared by the opacity hotkeys and `adjust_opacity` requests. The change
/// is broadcast even when clamping leaves the value where it was.
pub fn adjust_opacity<W: WindowHandle>(
    controller: &mut WindowStateController<W>,
    delta: f64,
    config: &Config,
) -> Result<Vec<Effect>, CoreError> {
    let target = opacity::adjust(controller.state().opacity, delta, &config.opacity)?;
    Ok(controller
        .set_opacity(target)
        .map(|opacity| vec![Effect::Broadcast(StateEvent::OpacityChanged { opacity })])
        .unwrap_or_default())
}

fn navigate<W: WindowHandle>(
    controller: &WindowStateController<W>,
    direction: HistoryDirection,
) -> Vec<Effect> {
    // The page is not interactive while immersive
    if controller.state().is_immersive {
        tracing::debug!("Ignoring {:?} navigation in immersion mode", direction);
        return vec![];
    }
    vec![Effect::NavigateHistory(direction)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BoundsRecord, Rect};
    use crate::platform::mock::MockWindow;
    use crate::store::mock::MemoryStore;

    fn controller() -> WindowStateController<MockWindow> {
        let store: MemoryStore<BoundsRecord> = MemoryStore::new();
        WindowStateController::new(
            MockWindow::new(Rect::new(100, 100, 800, 600)),
            Config::new(),
            Box::new(store),
        )
    }

    fn opacity_events(effects: &[Effect]) -> Vec<f64> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::Broadcast(StateEvent::OpacityChanged { opacity }) => Some(*opacity),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_boss_key_toggles_visibility() {
        let mut controller = controller();
        let config = Config::new();
        let effects = run_action(ActionId::BossKey, &mut controller, &config).unwrap();
        assert!(effects.is_empty());
        assert!(!controller.state().is_visible);
    }

    #[test]
    fn test_immersion_mode_flips_and_broadcasts() {
        let mut controller = controller();
        let config = Config::new();

        let effects = run_action(ActionId::ImmersionMode, &mut controller, &config).unwrap();
        assert!(matches!(
            effects.as_slice(),
            [Effect::Broadcast(StateEvent::ImmersionChanged { immersive: true })]
        ));
        assert!(controller.state().is_immersive);

        let effects = run_action(ActionId::ImmersionMode, &mut controller, &config).unwrap();
        assert!(matches!(
            effects.as_slice(),
            [Effect::Broadcast(StateEvent::ImmersionChanged { immersive: false })]
        ));
        assert_eq!(controller.state().bounds, Rect::new(100, 100, 800, 600));
    }

    #[test]
    fn test_opacity_down_seven_times() {
        let mut controller = controller();
        let config = Config::new();
        let mut broadcast = Vec::new();
        for _ in 0..7 {
            let effects = run_action(ActionId::OpacityDown, &mut controller, &config).unwrap();
            broadcast.extend(opacity_events(&effects));
        }
        assert_eq!(controller.state().opacity, 0.3);
        assert_eq!(broadcast.len(), 7);
        assert_eq!(broadcast.last(), Some(&0.3));
    }

    #[test]
    fn test_opacity_up_at_max_still_broadcasts() {
        let mut controller = controller();
        let config = Config::new();
        let effects = run_action(ActionId::OpacityUp, &mut controller, &config).unwrap();
        assert_eq!(opacity_events(&effects), vec![1.0]);
    }

    #[test]
    fn test_invalid_step_is_an_error() {
        let mut controller = controller();
        let mut config = Config::new();
        config.opacity.step = f64::NAN;
        let err = run_action(ActionId::OpacityUp, &mut controller, &config).unwrap_err();
        assert!(matches!(err, CoreError::InvalidAdjustment { .. }));
        assert_eq!(controller.state().opacity, 1.0);
    }

    #[test]
    fn test_video_actions_emit_scripts() {
        let mut controller = controller();
        let config = Config::new();
        let cases = [
            (ActionId::VideoPause, VIDEO_TOGGLE_SCRIPT),
            (ActionId::VideoForward, VIDEO_FORWARD_SCRIPT),
            (ActionId::VideoBackward, VIDEO_BACKWARD_SCRIPT),
        ];
        for (action, script) in cases {
            let effects = run_action(action, &mut controller, &config).unwrap();
            assert!(
                matches!(effects.as_slice(), [Effect::ExecuteScript(s)] if s == script),
                "{}",
                action
            );
        }
        assert!(VIDEO_FORWARD_SCRIPT.contains("currentTime += 10"));
        assert!(VIDEO_BACKWARD_SCRIPT.contains("currentTime -= 10"));
    }

    #[test]
    fn test_navigation() {
        let mut controller = controller();
        let config = Config::new();
        let effects = run_action(ActionId::GoBack, &mut controller, &config).unwrap();
        assert!(matches!(
            effects.as_slice(),
            [Effect::NavigateHistory(HistoryDirection::Back)]
        ));
        let effects = run_action(ActionId::GoForward, &mut controller, &config).unwrap();
        assert!(matches!(
            effects.as_slice(),
            [Effect::NavigateHistory(HistoryDirection::Forward)]
        ));
    }

    #[test]
    fn test_navigation_suppressed_while_immersive() {
        let mut controller = controller();
        let config = Config::new();
        run_action(ActionId::ImmersionMode, &mut controller, &config).unwrap();
        assert!(run_action(ActionId::GoBack, &mut controller, &config)
            .unwrap()
            .is_empty());
        assert!(run_action(ActionId::GoForward, &mut controller, &config)
            .unwrap()
            .is_empty());
    }
}
