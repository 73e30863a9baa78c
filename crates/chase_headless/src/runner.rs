//! Headless game runner implementation.
//!
//! The runner owns a [`Session`] and a virtual clock. Commands come in one at
//! a time; each produces zero or more [`Response`]s. Nothing here reads the
//! wall clock, so a recorded command stream always plays out the same way.

use std::io::{self, BufRead, Write};
use std::time::Duration;

use chase_core::game::{CycleEvents, Event};
use chase_core::session::Session;
use chase_core::store::ScoreStore;
use serde::{Deserialize, Serialize};

use crate::ascii_visualizer::{render_frame, AsciiConfig};
use crate::protocol::{Command, Response};

/// Most heartbeats a single `wait` or `heartbeat` command may run.
pub const MAX_CYCLES_PER_COMMAND: u64 = 10_000;

/// Headless runner configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadlessConfig {
    /// Virtual time between heartbeats.
    pub heartbeat_ms: u64,
    /// Output state after every command that ran a cycle.
    pub auto_state: bool,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            heartbeat_ms: 100,
            auto_state: false,
        }
    }
}

impl HeadlessConfig {
    /// The heartbeat period as a duration.
    pub fn heartbeat(&self) -> Duration {
        Duration::from_millis(self.heartbeat_ms)
    }
}

/// Drives a [`Session`] from protocol commands.
pub struct HeadlessRunner<S: ScoreStore> {
    session: Session<S>,
    config: HeadlessConfig,
    now: Duration,
    finished: bool,
}

impl<S: ScoreStore> HeadlessRunner<S> {
    /// Create a runner around an already started session.
    ///
    /// A zero heartbeat period is treated as one millisecond.
    pub fn new(session: Session<S>, mut config: HeadlessConfig) -> Self {
        if config.heartbeat_ms == 0 {
            tracing::warn!("Heartbeat period of 0 ms, using 1 ms");
            config.heartbeat_ms = 1;
        }
        Self {
            session,
            config,
            now: Duration::ZERO,
            finished: false,
        }
    }

    /// The session being driven.
    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// True once a quit has been processed.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Current state as a response.
    pub fn state(&self) -> Response {
        Response::State {
            now_ms: self.now_ms(),
            snapshot: self.session.snapshot(self.now),
            hash: self.session.game().state_hash(),
        }
    }

    /// Current frame, plain text.
    pub fn frame(&self) -> Response {
        Response::Frame {
            text: render_frame(&self.session.snapshot(self.now), &AsciiConfig::plain()),
        }
    }

    fn now_ms(&self) -> u64 {
        self.now.as_millis() as u64
    }

    /// Execute one command.
    pub fn execute(&mut self, command: Command) -> Vec<Response> {
        let mut responses = Vec::new();
        if self.finished {
            responses.push(Response::error("Runner has quit", Some(command.name())));
            return responses;
        }

        let cycles = match command {
            Command::Wait { ms } => ms / self.config.heartbeat_ms,
            Command::Heartbeat { count } => u64::from(count),
            _ => 0,
        };
        if cycles > MAX_CYCLES_PER_COMMAND {
            tracing::warn!(cycles, "Command would run too many heartbeats");
            responses.push(Response::error(
                format!(
                    "{} heartbeats requested, at most {} per command",
                    cycles, MAX_CYCLES_PER_COMMAND
                ),
                Some(command.name()),
            ));
            return responses;
        }

        let ran_cycle = match command {
            Command::Input { dir } => {
                self.dispatch(Event::Input(dir), &mut responses);
                true
            }
            Command::Wait { ms } => {
                let target = self.now + Duration::from_millis(ms);
                let period = self.config.heartbeat();
                while self.now + period <= target {
                    self.now += period;
                    self.dispatch(Event::Heartbeat, &mut responses);
                }
                self.now = target;
                true
            }
            Command::Heartbeat { count } => {
                for _ in 0..count {
                    self.now += self.config.heartbeat();
                    self.dispatch(Event::Heartbeat, &mut responses);
                }
                true
            }
            Command::Query => {
                responses.push(self.state());
                false
            }
            Command::Render => {
                responses.push(self.frame());
                false
            }
            Command::NewGame => {
                self.session.new_game(self.now);
                tracing::info!(now_ms = self.now_ms(), "New game started");
                responses.push(self.state());
                false
            }
            Command::Quit => {
                self.finished = true;
                responses.push(Response::Bye);
                false
            }
        };

        if ran_cycle && self.config.auto_state && !self.finished {
            responses.push(self.state());
        }
        responses
    }

    fn dispatch(&mut self, event: Event, responses: &mut Vec<Response>) {
        let events = self.session.handle(event, self.now);

        if events.quit {
            self.finished = true;
            responses.push(Response::Bye);
            return;
        }

        let report = events.game_over;
        if events != CycleEvents::default() {
            responses.push(Response::Events {
                now_ms: self.now_ms(),
                events,
            });
        }
        if let Some(report) = report {
            responses.push(Response::GameOver { report });
        }
    }

    /// Run the protocol loop: JSON commands from `input`, JSON responses to
    /// `output`, until quit or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        output.write_all(Response::ready(self.config.heartbeat_ms).to_json_line().as_bytes())?;
        output.flush()?;

        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let responses = match Command::from_json(line) {
                Ok(command) => {
                    tracing::debug!(cmd = command.name(), "Command received");
                    self.execute(command)
                }
                Err(e) => vec![Response::error(format!("Parse error: {}", e), None)],
            };

            for response in &responses {
                output.write_all(response.to_json_line().as_bytes())?;
            }
            output.flush()?;

            if self.finished {
                return Ok(());
            }
        }

        tracing::info!("Input closed");
        output.write_all(Response::Bye.to_json_line().as_bytes())?;
        output.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chase_core::components::InputCommand;
    use chase_core::config::GameConfig;
    use chase_core::store::MemoryScoreStore;

    fn runner(config: HeadlessConfig) -> HeadlessRunner<MemoryScoreStore> {
        let session = Session::new(GameConfig::with_seed(7), MemoryScoreStore::default()).unwrap();
        HeadlessRunner::new(session, config)
    }

    #[test]
    fn test_input_reports_events() {
        let mut runner = runner(HeadlessConfig::default());
        // (10, 11) is empty, (11, 11) holds a collectible.
        assert!(runner
            .execute(Command::Input {
                dir: InputCommand::Right
            })
            .is_empty());
        let responses = runner.execute(Command::Input {
            dir: InputCommand::Right,
        });
        assert!(matches!(
            &responses[..],
            [Response::Events { now_ms: 0, events }] if events.consumed.is_some()
        ));
    }

    #[test]
    fn test_wait_advances_virtual_clock() {
        let mut runner = runner(HeadlessConfig::default());
        let responses = runner.execute(Command::Wait { ms: 1_050 });
        assert_eq!(runner.now(), Duration::from_millis(1_050));

        // Adversaries move at 500 and 1000.
        let moves: Vec<u64> = responses
            .iter()
            .filter_map(|r| match r {
                Response::Events { now_ms, events } if events.adversaries_moved => Some(*now_ms),
                _ => None,
            })
            .collect();
        assert_eq!(moves, vec![500, 1_000]);
    }

    #[test]
    fn test_heartbeat_count_and_auto_state() {
        let mut runner = runner(HeadlessConfig {
            heartbeat_ms: 250,
            auto_state: true,
            ..HeadlessConfig::default()
        });
        let responses = runner.execute(Command::Heartbeat { count: 2 });
        assert_eq!(runner.now(), Duration::from_millis(500));
        assert!(matches!(
            responses.last(),
            Some(Response::State { now_ms: 500, .. })
        ));
    }

    #[test]
    fn test_oversized_wait_is_rejected() {
        let mut runner = runner(HeadlessConfig::default());
        let responses = runner.execute(Command::Wait { ms: u64::MAX });
        assert!(matches!(
            &responses[..],
            [Response::Error { cmd: Some(cmd), .. }] if cmd == "wait"
        ));
        assert!(matches!(
            &runner.execute(Command::Heartbeat { count: 10_001 })[..],
            [Response::Error { .. }]
        ));
        assert_eq!(runner.now(), Duration::ZERO);
        assert_eq!(runner.session().game().cycles(), 0);

        // The cap itself is allowed.
        runner.execute(Command::Wait {
            ms: MAX_CYCLES_PER_COMMAND * 100,
        });
        assert_eq!(runner.now(), Duration::from_millis(1_000_000));
    }

    #[test]
    fn test_query_and_render_do_not_advance() {
        let mut runner = runner(HeadlessConfig::default());
        let hash = runner.session().game().state_hash();
        assert!(matches!(&runner.execute(Command::Query)[..], [Response::State { .. }]));
        match &runner.execute(Command::Render)[..] {
            [Response::Frame { text }] => assert!(text.starts_with("Score: 0")),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(runner.session().game().state_hash(), hash);
        assert_eq!(runner.now(), Duration::ZERO);
    }

    #[test]
    fn test_quit_input_finishes() {
        let mut runner = runner(HeadlessConfig::default());
        let responses = runner.execute(Command::Input {
            dir: InputCommand::Quit,
        });
        assert_eq!(responses, vec![Response::Bye]);
        assert!(runner.is_finished());
        assert!(matches!(
            &runner.execute(Command::Query)[..],
            [Response::Error { .. }]
        ));
    }

    #[test]
    fn test_protocol_loop() {
        let mut runner = runner(HeadlessConfig::default());
        let input = "{\"cmd\":\"query\"}\n\nnot json\n{\"cmd\":\"quit\"}\n{\"cmd\":\"query\"}\n";
        let mut output = Vec::new();
        runner.run(input.as_bytes(), &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        let kinds: Vec<String> = text
            .lines()
            .map(|line| {
                let value: serde_json::Value = serde_json::from_str(line).unwrap();
                value["type"].as_str().unwrap().to_string()
            })
            .collect();
        assert_eq!(kinds, vec!["ready", "state", "error", "bye"]);
    }

    #[test]
    fn test_end_of_input_says_bye() {
        let mut runner = runner(HeadlessConfig::default());
        let mut output = Vec::new();
        runner.run("".as_bytes(), &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();
        assert!(text.ends_with("{\"type\":\"bye\"}\n"));
    }
}
