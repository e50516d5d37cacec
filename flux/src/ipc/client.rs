use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;

use anyhow::{Context, Result};

use flux_ipc::{Command, EventFilter, Response, StateEvent, SubscribeRequest};

pub struct IpcClient {
    stream: UnixStream,
}

impl IpcClient {
    pub fn connect() -> Result<Self> {
        let stream =
            UnixStream::connect(super::socket_path()).context("Failed to connect to flux daemon")?;
        Ok(Self { stream })
    }

    pub fn send(&mut self, cmd: &Command) -> Result<Response> {
        let json = serde_json::to_string(cmd)?;
        writeln!(self.stream, "{}", json)?;
        self.stream.flush()?;

        let mut reader = BufReader::new(&self.stream);
        let mut line = String::new();
        reader.read_line(&mut line)?;
        if line.is_empty() {
            anyhow::bail!("Daemon closed the connection");
        }

        let response: Response =
            serde_json::from_str(&line).context("Malformed response from daemon")?;
        Ok(response)
    }
}

/// Blocking subscriber on the event socket
pub struct EventClient {
    reader: BufReader<UnixStream>,
}

impl EventClient {
    pub fn connect(request: &SubscribeRequest) -> Result<Self> {
        let mut stream = UnixStream::connect(super::event_socket_path())
            .context("Failed to connect to flux event server")?;

        let json = serde_json::to_string(request)?;
        writeln!(stream, "{}", json)?;
        stream.flush()?;

        Ok(Self {
            reader: BufReader::new(stream),
        })
    }

    /// `None` once the daemon closes the stream
    pub fn next_event(&mut self) -> Result<Option<StateEvent>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let event: StateEvent = serde_json::from_str(&line)?;
        Ok(Some(event))
    }
}

/// Subscribe and print events to stdout, one JSON object per line
pub fn subscribe_and_print(snapshot: bool, filter: Option<EventFilter>) -> Result<()> {
    let request = SubscribeRequest {
        snapshot,
        filter: filter.unwrap_or_default(),
    };

    let mut client = EventClient::connect(&request)?;
    while let Some(event) = client.next_event()? {
        println!("{}", serde_json::to_string(&event)?);
    }

    Ok(())
}
