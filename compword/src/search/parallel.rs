use crossbeam_channel::{bounded, select, Receiver, Sender, TryRecvError};
use std::num::NonZeroUsize;
use std::thread;
use tracing::{debug, trace};

use super::{scan_bucket, Decomposer, InvalidWords, SearchStrategy};
use crate::config::{ResultOrdering, SearchMode, SplitBound};
use crate::lexicon::{BucketKey, Lexicon};
use crate::metrics::SearchMetrics;

/// Worker-pool race over the lexicon's buckets.
///
/// One dispatcher thread hands out bucket indices in strides of the pool
/// size, longest buckets first. Each worker walks the buckets it receives
/// with a private memo and reports back on a shared result channel. The
/// caller blocks on that channel; as soon as it has an answer it broadcasts
/// cancellation and every thread winds down.
///
/// All threads are scoped, so the lexicon is borrowed rather than shared
/// through an `Arc`. Cancellation is the disconnect of a channel nobody ever
/// sends on: dropping its only sender wakes every receiver at once.
#[derive(Debug, Clone)]
pub struct ParallelSearch {
    workers: NonZeroUsize,
    bound: SplitBound,
    ordering: ResultOrdering,
    metrics: SearchMetrics,
}

/// Messages on the result channel
#[derive(Debug)]
enum Report {
    /// First compound word of the bucket at `index`
    Found { index: usize, word: String },
    /// The bucket at `index` holds no compound word
    Finished { index: usize },
    /// Every bucket was handed out and every worker has exited
    Exhausted,
}

impl ParallelSearch {
    pub fn new(
        workers: NonZeroUsize,
        bound: SplitBound,
        ordering: ResultOrdering,
        metrics: SearchMetrics,
    ) -> Self {
        Self {
            workers,
            bound,
            ordering,
            metrics,
        }
    }

    /// Blocks until the reports settle on an answer
    fn await_answer(&self, reports: &Receiver<Report>, keys: &[BucketKey]) -> String {
        match self.ordering {
            ResultOrdering::FirstFound => {
                for report in reports.iter() {
                    match report {
                        Report::Found { word, .. } => return word,
                        Report::Exhausted => break,
                        Report::Finished { .. } => {}
                    }
                }
                String::new()
            }
            ResultOrdering::LongestFirst => {
                let mut collector = OrderedCollector::new(keys);
                for report in reports.iter() {
                    match report {
                        Report::Found { index, word } => collector.complete(index, Some(word)),
                        Report::Finished { index } => collector.complete(index, None),
                        Report::Exhausted => break,
                    }
                    if let Some(word) = collector.settled() {
                        return word;
                    }
                }
                collector.into_best().unwrap_or_default()
            }
        }
    }
}

impl SearchStrategy for ParallelSearch {
    fn mode(&self) -> SearchMode {
        SearchMode::Parallel
    }

    fn search(&self, lexicon: &Lexicon) -> String {
        let pool_size = self.workers.get();
        let keys = lexicon.sorted_keys();

        let (task_tx, task_rx) = bounded::<usize>(pool_size);
        // Room for every thread to report once more while shutting down
        let (report_tx, report_rx) = bounded::<Report>(pool_size + 1);
        let (cancel_tx, cancel_rx) = bounded::<()>(0);
        let (alive_tx, alive_rx) = bounded::<()>(0);

        thread::scope(|s| {
            for id in 0..pool_size {
                let worker = Worker {
                    id,
                    lexicon,
                    decomposer: Decomposer::new(lexicon, self.bound),
                    tasks: task_rx.clone(),
                    reports: report_tx.clone(),
                    cancel: cancel_rx.clone(),
                    _alive: alive_tx.clone(),
                    metrics: self.metrics.clone(),
                };
                s.spawn(move || worker.run());
            }
            drop(alive_tx);
            drop(task_rx);

            let dispatcher = Dispatcher {
                bucket_count: keys.len(),
                stride: pool_size,
                tasks: task_tx,
                reports: report_tx,
                cancel: cancel_rx,
                alive: alive_rx,
            };
            s.spawn(move || dispatcher.run());

            let answer = self.await_answer(&report_rx, keys);
            drop(cancel_tx);
            debug!("Search settled, cancelling workers");
            answer
        })
    }
}

/// Sends on `channel` unless cancellation arrives first
fn send_unless_cancelled<T>(channel: &Sender<T>, message: T, cancel: &Receiver<()>) -> bool {
    // select! picks randomly among ready operations, so look at cancel first
    if is_cancelled(cancel) {
        return false;
    }
    select! {
        send(channel, message) -> res => res.is_ok(),
        recv(cancel) -> _ => false,
    }
}

fn is_cancelled(cancel: &Receiver<()>) -> bool {
    !matches!(cancel.try_recv(), Err(TryRecvError::Empty))
}

struct Dispatcher {
    bucket_count: usize,
    stride: usize,
    tasks: Sender<usize>,
    reports: Sender<Report>,
    cancel: Receiver<()>,
    alive: Receiver<()>,
}

impl Dispatcher {
    fn run(self) {
        for start in (0..self.bucket_count).step_by(self.stride) {
            if is_cancelled(&self.cancel) {
                debug!("Done sending work to workers");
                return;
            }
            let end = (start + self.stride).min(self.bucket_count);
            for index in start..end {
                if !send_unless_cancelled(&self.tasks, index, &self.cancel) {
                    return;
                }
            }
        }

        // Closing the task channel lets idle workers exit; the sentinel may
        // only go out once the last of them has reported
        drop(self.tasks);
        let drained = select! {
            recv(self.alive) -> _ => true,
            recv(self.cancel) -> _ => false,
        };
        if drained {
            debug!("All buckets searched");
            send_unless_cancelled(&self.reports, Report::Exhausted, &self.cancel);
        }
    }
}

/// `Idle -> Processing(index) -> Idle`, until cancelled or out of work
struct Worker<'a> {
    id: usize,
    lexicon: &'a Lexicon,
    decomposer: Decomposer<'a>,
    tasks: Receiver<usize>,
    reports: Sender<Report>,
    cancel: Receiver<()>,
    /// Dropped on exit; the dispatcher watches for the last one
    _alive: Sender<()>,
    metrics: SearchMetrics,
}

impl Worker<'_> {
    fn run(self) {
        let mut memo = InvalidWords::new();

        while !is_cancelled(&self.cancel) {
            let task = select! {
                recv(self.cancel) -> _ => None,
                recv(self.tasks) -> msg => msg.ok(),
            };
            let Some(index) = task else {
                break;
            };

            let key = self.lexicon.sorted_keys()[index];
            trace!("Worker {} processing bucket {} {:?}", self.id, index, key);
            let hit = scan_bucket(
                &self.decomposer,
                self.lexicon.bucket(&key),
                &mut memo,
                &self.metrics,
                || is_cancelled(&self.cancel),
            );

            let report = match hit {
                Some(word) => {
                    debug!("Worker {} found {:?}", self.id, word);
                    Report::Found {
                        index,
                        word: word.to_owned(),
                    }
                }
                None => Report::Finished { index },
            };
            if !send_unless_cancelled(&self.reports, report, &self.cancel) {
                break;
            }
        }

        self.metrics.record_memo(memo.len());
        debug!(
            "Worker {} terminated, invalid word set size {}",
            self.id,
            memo.len()
        );
    }
}

/// Accepts a hit only once no longer bucket can still produce one.
///
/// Keys are sorted longest first, so "every longer bucket is done" means
/// every index before the hit's index has reported. Among settled hits the
/// lowest index wins, which is exactly the word a sequential scan returns.
struct OrderedCollector<'a> {
    keys: &'a [BucketKey],
    done: Vec<bool>,
    frontier: usize,
    best: Option<(usize, String)>,
}

impl<'a> OrderedCollector<'a> {
    fn new(keys: &'a [BucketKey]) -> Self {
        Self {
            keys,
            done: vec![false; keys.len()],
            frontier: 0,
            best: None,
        }
    }

    fn complete(&mut self, index: usize, found: Option<String>) {
        if let Some(slot) = self.done.get_mut(index) {
            *slot = true;
        }
        if let Some(word) = found {
            if self.best.as_ref().map_or(true, |(best, _)| index < *best) {
                trace!(
                    "Candidate {:?} from bucket {} (length {})",
                    word,
                    index,
                    self.keys[index].len
                );
                self.best = Some((index, word));
            }
        }
        while self.done.get(self.frontier).copied().unwrap_or(false) {
            self.frontier += 1;
        }
    }

    /// The best hit, if everything before it has reported
    fn settled(&mut self) -> Option<String> {
        let ready = matches!(&self.best, Some((index, _)) if *index < self.frontier);
        if ready {
            self.best.take().map(|(_, word)| word)
        } else {
            None
        }
    }

    fn into_best(self) -> Option<String> {
        self.best.map(|(_, word)| word)
    }
}
