//! Flat Monte Carlo move search.
//!
//! The search keeps no tree. Every root candidate is evaluated by random
//! playouts run in parallel on worker threads:
//! - each worker samples a candidate in proportion to its own win-rate
//!   estimate (seeded with an optimistic 1/2 prior), plays it on a clone of
//!   the root, runs one playout and reports `(candidate, won)`
//! - the calling thread collects the reports into the global statistics
//!   until the time budget runs out, then picks the best win-rate
//!
//! Workers are detached. When the search ends it raises a stop flag and
//! drops the result channel; each worker notices before its next playout
//! and exits.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, SyncSender};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info, trace, warn};

use crate::board::{Color, Goban, Point};
use crate::constants::{DEFAULT_GENMOVE_SECS, PRIOR_TRIALS, PRIOR_WINS};
use crate::group::move_list;
use crate::playout::play_random_game;
use crate::position::GameState;
use crate::scratch::Worklist;
use crate::score::winner;

/// Win/trial counts for one root candidate.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MoveStats {
    pub wins: u32,
    pub trials: u32,
}

impl MoveStats {
    pub fn new(wins: u32, trials: u32) -> Self {
        Self { wins, trials }
    }

    #[inline]
    pub fn record(&mut self, won: bool) {
        self.trials += 1;
        if won {
            self.wins += 1;
        }
    }

    /// Win-rate, or 0 for a candidate that was never tried.
    #[inline]
    pub fn winrate(&self) -> f64 {
        if self.trials > 0 {
            self.wins as f64 / self.trials as f64
        } else {
            0.0
        }
    }

    /// Strictly better win-rate than `other`, compared without division.
    #[inline]
    pub fn beats(&self, other: &MoveStats) -> bool {
        self.wins as u64 * other.trials as u64 > other.wins as u64 * self.trials as u64
    }
}

/// Search settings.
#[derive(Clone, Debug)]
pub struct SearchConfig {
    /// Wall-clock time spent collecting playout results.
    pub time_budget: Duration,
    /// Worker thread count. `None` uses one per available CPU.
    pub workers: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            time_budget: Duration::from_secs_f64(DEFAULT_GENMOVE_SECS),
            workers: None,
        }
    }
}

impl SearchConfig {
    pub fn with_time_budget(mut self, time_budget: Duration) -> Self {
        self.time_budget = time_budget;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn worker_count(&self) -> usize {
        self.workers
            .unwrap_or_else(|| thread::available_parallelism().map_or(1, |n| n.get()))
            .max(1)
    }
}

/// Result of [`get_best_move`].
#[derive(Clone, Debug)]
pub struct SearchOutcome {
    /// Chosen move, or `None` to pass.
    pub best: Option<Point>,
    /// Root candidates in enumeration order.
    pub candidates: Vec<Point>,
    /// Global statistics, parallel to `candidates`.
    pub stats: Vec<MoveStats>,
    /// Playout results collected before the deadline.
    pub playouts: u64,
}

impl SearchOutcome {
    fn pass() -> Self {
        Self {
            best: None,
            candidates: Vec::new(),
            stats: Vec::new(),
            playouts: 0,
        }
    }
}

/// One finished playout as reported by a worker.
struct Report {
    candidate: usize,
    won: bool,
}

/// Index of the candidate with the highest win-rate. Ties keep the earlier
/// candidate.
pub fn select_best(stats: &[MoveStats]) -> Option<usize> {
    if stats.is_empty() {
        return None;
    }
    let mut best = 0;
    for (i, s) in stats.iter().enumerate().skip(1) {
        if s.beats(&stats[best]) {
            best = i;
        }
    }
    Some(best)
}

/// Draw a candidate index with probability proportional to its win-rate.
fn sample(stats: &[MoveStats], rng: &mut fastrand::Rng) -> usize {
    let total: f64 = stats.iter().map(MoveStats::winrate).sum();
    let mut r = rng.f64() * total;
    for (i, s) in stats.iter().enumerate() {
        r -= s.winrate();
        if r < 0.0 {
            return i;
        }
    }
    stats.len() - 1
}

/// Play `candidate` on a clone of `root`, finish the game randomly and report
/// whether `color` won. `scratch` is lent to the clone and handed back.
fn evaluate(
    root: &GameState,
    candidate: Point,
    color: Color,
    rng: &mut fastrand::Rng,
    scratch: &mut Worklist,
) -> bool {
    let mut game = root.clone();
    game.board_mut().put_scratch(std::mem::take(scratch));
    game.play(candidate, color);
    play_random_game(&mut game, color.opposite(), rng);
    let won = winner(&game) == color;
    *scratch = game.board_mut().take_scratch();
    won
}

fn run_worker(
    root: Arc<GameState>,
    candidates: Arc<[Point]>,
    color: Color,
    results: SyncSender<Report>,
    stop: Arc<AtomicBool>,
) {
    let mut rng = fastrand::Rng::new();
    let mut local = vec![MoveStats::new(PRIOR_WINS, PRIOR_TRIALS); candidates.len()];
    let mut scratch = Worklist::with_capacity(root.board().area());
    let mut played = 0u64;

    while !stop.load(Ordering::Relaxed) {
        let candidate = sample(&local, &mut rng);
        let won = evaluate(&root, candidates[candidate], color, &mut rng, &mut scratch);
        local[candidate].record(won);
        played += 1;
        if results.send(Report { candidate, won }).is_err() {
            break;
        }
    }
    trace!("search worker exiting after {played} playouts");
}

/// Run playouts on the calling thread until `deadline`, and at least once.
///
/// Used when no worker thread could be started.
fn search_inline(
    root: &GameState,
    candidates: &[Point],
    color: Color,
    deadline: Instant,
    stats: &mut [MoveStats],
) -> u64 {
    let mut rng = fastrand::Rng::new();
    let mut local = vec![MoveStats::new(PRIOR_WINS, PRIOR_TRIALS); candidates.len()];
    let mut scratch = Worklist::with_capacity(root.board().area());
    let mut playouts = 0u64;
    while playouts == 0 || Instant::now() < deadline {
        let candidate = sample(&local, &mut rng);
        let won = evaluate(root, candidates[candidate], color, &mut rng, &mut scratch);
        local[candidate].record(won);
        stats[candidate].record(won);
        playouts += 1;
    }
    playouts
}

/// Find a move for `color` by parallel random playouts.
///
/// Runs for `config.time_budget`, but always waits for at least one
/// playout result when there is anything to choose from. Returns a pass
/// (`best == None`) if `color` has no candidate move.
pub fn get_best_move(state: &GameState, color: Color, config: &SearchConfig) -> SearchOutcome {
    let mut root = state.clone();
    let candidates = move_list(root.board_mut(), color);
    if candidates.is_empty() {
        info!("no candidate moves for {color:?}, passing");
        return SearchOutcome::pass();
    }

    let workers = config.worker_count();
    let (tx, rx) = mpsc::sync_channel(workers);
    let stop = Arc::new(AtomicBool::new(false));
    let root = Arc::new(root);
    let shared: Arc<[Point]> = candidates.clone().into();
    let mut spawned = 0;
    for i in 0..workers {
        let (root, shared, tx, stop) = (root.clone(), shared.clone(), tx.clone(), stop.clone());
        let handle = thread::Builder::new()
            .name(format!("playout-{i}"))
            .spawn(move || run_worker(root, shared, color, tx, stop));
        match handle {
            Ok(_) => spawned += 1,
            Err(e) => warn!("failed to start search worker {i}: {e}"),
        }
    }
    drop(tx);

    let started = Instant::now();
    let deadline = started + config.time_budget;
    let mut stats = vec![MoveStats::default(); candidates.len()];
    let mut playouts = 0u64;
    if spawned == 0 {
        warn!("no search workers running, searching on the calling thread");
        playouts = search_inline(&root, &candidates, color, deadline, &mut stats);
    } else {
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let received = if remaining.is_zero() {
                if playouts > 0 {
                    break;
                }
                rx.recv().map_err(|_| RecvTimeoutError::Disconnected)
            } else {
                rx.recv_timeout(remaining)
            };
            match received {
                Ok(report) => {
                    stats[report.candidate].record(report.won);
                    playouts += 1;
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    warn!("all search workers stopped before the deadline");
                    if playouts == 0 {
                        playouts = search_inline(&root, &candidates, color, deadline, &mut stats);
                    }
                    break;
                }
            }
        }
    }
    stop.store(true, Ordering::Relaxed);
    drop(rx);

    for (p, s) in candidates.iter().zip(&stats) {
        debug!("move {p:?} : {} / {} = {:.3}", s.wins, s.trials, s.winrate());
    }
    let elapsed = started.elapsed().as_secs_f64();
    info!(
        "{playouts} playouts on {spawned} workers in {elapsed:.2}s ({:.0} playouts/s)",
        playouts as f64 / elapsed.max(f64::EPSILON)
    );

    let best = select_best(&stats).map(|i| candidates[i]);
    info!("best move for {color:?}: {best:?}");
    SearchOutcome {
        best,
        candidates,
        stats,
        playouts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardKind;

    fn quick() -> SearchConfig {
        SearchConfig::default()
            .with_time_budget(Duration::from_millis(200))
            .with_workers(2)
    }

    #[test]
    fn test_beats_uses_cross_multiplication() {
        assert!(MoveStats::new(2, 3).beats(&MoveStats::new(1, 2)));
        assert!(!MoveStats::new(1, 2).beats(&MoveStats::new(2, 4)));
        assert!(!MoveStats::new(0, 0).beats(&MoveStats::new(0, 0)));
    }

    #[test]
    fn test_select_best() {
        assert_eq!(select_best(&[]), None);
        let stats = [
            MoveStats::new(1, 2),
            MoveStats::new(2, 3),
            MoveStats::new(4, 6),
            MoveStats::new(0, 5),
        ];
        // 2/3 and 4/6 tie; the earlier one wins.
        assert_eq!(select_best(&stats), Some(1));
    }

    #[test]
    fn test_sample_follows_winrate() {
        let stats = [MoveStats::new(9, 10), MoveStats::new(1, 10)];
        let mut rng = fastrand::Rng::with_seed(99);
        let lots = 10_000;
        let first = (0..lots).filter(|_| sample(&stats, &mut rng) == 0).count();
        let share = first as f64 / lots as f64;
        assert!((0.85..0.95).contains(&share), "share was {share}");
    }

    #[test]
    fn test_single_candidate_is_chosen() {
        let state = GameState::from_layout(BoardKind::Flat, 1, 4, 0.0, "xo.o").unwrap();
        let outcome = get_best_move(&state, Color::Black, &quick());
        assert_eq!(outcome.candidates, vec![(0, 2)]);
        assert_eq!(outcome.best, Some((0, 2)));
        assert!(outcome.stats[0].trials > 0);
    }

    #[test]
    fn test_single_candidate_with_zero_budget() {
        let state = GameState::from_layout(BoardKind::Rows, 1, 4, 0.0, "xo.o").unwrap();
        let config = quick().with_time_budget(Duration::ZERO);
        let outcome = get_best_move(&state, Color::Black, &config);
        assert_eq!(outcome.best, Some((0, 2)));
        assert!(outcome.playouts > 0);
    }

    #[test]
    fn test_inline_search_runs_at_least_one_playout() {
        let root = GameState::from_layout(BoardKind::Flat, 1, 4, 0.0, "xo.o").unwrap();
        let candidates = [(0, 2)];
        let mut stats = [MoveStats::default()];
        let deadline = Instant::now();
        let playouts = search_inline(&root, &candidates, Color::Black, deadline, &mut stats);
        assert!(playouts >= 1);
        assert_eq!(stats[0].trials as u64, playouts);
        assert_eq!(select_best(&stats), Some(0));
        assert_eq!(root.board().layout(), "xo.o");
    }

    #[test]
    fn test_no_candidates_pass() {
        let state = GameState::from_layout(BoardKind::Flat, 1, 4, 0.0, "xoxo").unwrap();
        let outcome = get_best_move(&state, Color::White, &quick());
        assert_eq!(outcome.best, None);
        assert_eq!(outcome.playouts, 0);
    }

    #[test]
    fn test_stats_account_for_every_playout() {
        let state = GameState::new(BoardKind::Flat, 4, 4).unwrap();
        let outcome = get_best_move(&state, Color::Black, &quick());
        assert_eq!(outcome.candidates.len(), 16);
        let trials: u64 = outcome.stats.iter().map(|s| s.trials as u64).sum();
        assert_eq!(trials, outcome.playouts);
        assert!(outcome.stats.iter().all(|s| s.wins <= s.trials));
        assert!(outcome.best.is_some());
    }

    #[test]
    fn test_root_is_untouched() {
        let state = GameState::from_layout(BoardKind::Rows, 3, 3, 0.5, "x.. / .o. / ...").unwrap();
        get_best_move(&state, Color::White, &quick());
        assert_eq!(state.board().layout(), "x...o....");
        assert_eq!(state.captured_black(), 0);
    }
}
