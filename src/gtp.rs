//! Go Text Protocol (GTP) driver.
//!
//! A thin adapter over [`GameState`]: it parses commands, converts vertices
//! like `D4` to board points, and frames replies. The engine core never sees
//! any text.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`, `list_commands`, `quit`
//! - `boardsize <size>` - Replace the board with an empty `size x size` board
//! - `clear_board` - Empty the board
//! - `komi <value>` - Set komi
//! - `play <color> <vertex>` - Play a move (no eye pruning is applied)
//! - `genmove <color>` - Search, play and report a move for the given color
//!
//! Replies are framed as `= <result>` on success, `? <message>` on a failed
//! command and a bare `?` on an unknown command, each followed by a blank
//! line.
//!
//! Columns are lettered `A`..`Z` skipping `I`, as in standard Go notation.
//! Row numbers start at 1 for board row 0.
//!
//! ## Example
//!
//! ```no_run
//! use randgo::gtp::Session;
//! let mut session = Session::default();
//! session.run(std::io::stdin().lock(), std::io::stdout().lock()).unwrap();
//! ```

use std::io::{BufRead, Write};

use anyhow::{Context, Result, anyhow, bail, ensure};
use log::{trace, warn};

use crate::board::{Color, Goban, Point};
use crate::constants::GTP_MAX_SIZE;
use crate::group::is_suicide;
use crate::mcts::SearchConfig;
use crate::position::GameState;

const ENGINE_NAME: &str = "randgo";

/// The list of known GTP commands.
const KNOWN_COMMANDS: &[&str] = &[
    "boardsize",
    "clear_board",
    "genmove",
    "komi",
    "list_commands",
    "name",
    "play",
    "protocol_version",
    "quit",
    "version",
];

/// A GTP session: the game being played and the search settings.
#[derive(Default)]
pub struct Session {
    state: GameState,
    config: SearchConfig,
}

impl Session {
    pub fn new(state: GameState, config: SearchConfig) -> Self {
        Self { state, config }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Serve commands from `input` until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        for line in input.lines() {
            let line = line.context("failed to read GTP command")?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut parts = line.split_whitespace();
            let Some(command) = parts.next() else {
                continue;
            };
            let command = command.to_lowercase();
            let args: Vec<&str> = parts.collect();

            trace!("gtp <- {line}");
            let reply = match self.execute(&command, &args) {
                Some(Ok(message)) => format!("= {message}\n\n"),
                Some(Err(e)) => {
                    warn!("gtp command {line:?} failed: {e:#}");
                    format!("? {e}\n\n")
                }
                None => {
                    warn!("unknown gtp command {command:?}");
                    "?\n\n".to_string()
                }
            };
            trace!("gtp -> {}", reply.trim_end());
            output.write_all(reply.as_bytes())?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Execute one command. `None` means the command is not known.
    fn execute(&mut self, command: &str, args: &[&str]) -> Option<Result<String>> {
        let result = match command {
            "name" => Ok(ENGINE_NAME.to_string()),
            "version" => Ok(env!("CARGO_PKG_VERSION").to_string()),
            "protocol_version" => Ok("2".to_string()),
            "list_commands" => Ok(KNOWN_COMMANDS.join("\n")),
            "quit" => Ok(String::new()),
            "boardsize" => self.boardsize(args),
            "clear_board" => {
                self.state.clear_board();
                Ok(String::new())
            }
            "komi" => self.komi(args),
            "play" => self.play(args),
            "genmove" => self.genmove(args),
            _ => return None,
        };
        Some(result)
    }

    fn boardsize(&mut self, args: &[&str]) -> Result<String> {
        let arg = args.first().ok_or_else(|| anyhow!("missing argument"))?;
        let size: usize = arg.parse().with_context(|| format!("invalid size {arg:?}"))?;
        check_size(size)?;
        self.state.board_size(size)?;
        Ok(String::new())
    }

    fn komi(&mut self, args: &[&str]) -> Result<String> {
        let arg = args.first().ok_or_else(|| anyhow!("missing argument"))?;
        let komi: f32 = arg.parse().with_context(|| format!("invalid komi {arg:?}"))?;
        ensure!(komi.is_finite(), "invalid komi {arg:?}");
        self.state.set_komi(komi);
        Ok(String::new())
    }

    fn play(&mut self, args: &[&str]) -> Result<String> {
        let [color, vertex, ..] = args else {
            bail!("missing arguments");
        };
        let color = parse_color(color)?;
        let Some(p) = parse_vertex(vertex)? else {
            return Ok(String::new());
        };
        let board = self.state.board_mut();
        ensure!(board.get(p)? == Color::Empty, "illegal move: point not empty");
        ensure!(!is_suicide(board, p, color), "illegal move: suicide");
        self.state.play(p, color);
        Ok(String::new())
    }

    fn genmove(&mut self, args: &[&str]) -> Result<String> {
        let arg = args.first().ok_or_else(|| anyhow!("missing argument"))?;
        let color = parse_color(arg)?;
        let board = self.state.board();
        check_size(board.rows().max(board.cols()))?;
        match self.state.gen_move(color, &self.config) {
            Some(p) => format_vertex(p),
            None => Ok("pass".to_string()),
        }
    }
}

/// Fail unless a `size x size` board can be addressed with vertices.
pub fn check_size(size: usize) -> Result<()> {
    ensure!(
        (1..=GTP_MAX_SIZE).contains(&size),
        "unacceptable size, must be 1..={GTP_MAX_SIZE} (got {size})"
    );
    Ok(())
}

fn parse_color(s: &str) -> Result<Color> {
    match s.to_lowercase().as_str() {
        "b" | "black" => Ok(Color::Black),
        "w" | "white" => Ok(Color::White),
        _ => bail!("invalid color {s:?}"),
    }
}

/// Parse a vertex such as `D4`. Returns `None` for `pass`.
///
/// Bounds are checked against the board by the caller.
pub fn parse_vertex(s: &str) -> Result<Option<Point>> {
    if s.eq_ignore_ascii_case("pass") {
        return Ok(None);
    }
    let mut chars = s.chars();
    let letter = chars
        .next()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .ok_or_else(|| anyhow!("invalid vertex {s:?}"))?;
    ensure!(letter != 'I', "invalid vertex {s:?}: column I is not used");
    let mut col = (letter as u8 - b'A') as usize;
    if letter > 'I' {
        col -= 1;
    }
    let number: usize = chars
        .as_str()
        .parse()
        .with_context(|| format!("invalid vertex {s:?}"))?;
    ensure!(number >= 1, "invalid vertex {s:?}: rows start at 1");
    Ok(Some((number - 1, col)))
}

/// Format a board point as a vertex such as `D4`.
///
/// Only the first [`GTP_MAX_SIZE`] columns have a letter.
pub fn format_vertex((row, col): Point) -> Result<String> {
    ensure!(col < GTP_MAX_SIZE, "column {col} has no GTP letter");
    let mut letter = b'A' + col as u8;
    if letter >= b'I' {
        letter += 1;
    }
    Ok(format!("{}{}", letter as char, row + 1))
}
