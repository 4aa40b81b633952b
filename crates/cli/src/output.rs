//! Renders sync progress: the action log on stdout, diagnostics on stderr.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tokio::sync::mpsc;

use syncpics_core::sync::SyncProgress;

const BAR_TEMPLATE: &str = "{spinner} [{elapsed_precise}] {wide_bar} {pos}/{len} {msg}";

/// Consumes progress events for one run.
pub struct ProgressPrinter {
    show_bar: bool,
    bar: Option<ProgressBar>,
}

impl ProgressPrinter {
    pub fn new(show_bar: bool) -> Self {
        Self {
            show_bar,
            bar: None,
        }
    }

    /// Handles events until the sender side is dropped.
    pub async fn run(mut self, mut rx: mpsc::Receiver<SyncProgress>) {
        while let Some(event) = rx.recv().await {
            self.handle(event);
        }
        self.finish();
    }

    fn handle(&mut self, event: SyncProgress) {
        match event {
            SyncProgress::Started { total } => {
                if self.show_bar {
                    self.bar = Some(new_bar(total as u64));
                }
            }
            SyncProgress::Action(entry) => {
                self.stdout(&entry.to_string());
                self.tick();
            }
            SyncProgress::Skipped { .. } => self.tick(),
            SyncProgress::ConversionFailed(failure) => {
                self.stderr(&format!(
                    "error: {}: {}",
                    failure.source.display(),
                    failure.error
                ));
            }
            SyncProgress::Draining { outstanding } => {
                if let Some(bar) = &self.bar {
                    bar.set_message(format!("waiting for {} conversions", outstanding));
                }
            }
            SyncProgress::Finished => self.finish(),
        }
    }

    fn tick(&self) {
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    fn stdout(&self, line: &str) {
        match &self.bar {
            Some(bar) => bar.suspend(|| println!("{}", line)),
            None => println!("{}", line),
        }
    }

    fn stderr(&self, line: &str) {
        match &self.bar {
            Some(bar) => bar.suspend(|| eprintln!("{}", line)),
            None => eprintln!("{}", line),
        }
    }

    fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

fn new_bar(total: u64) -> ProgressBar {
    let style = ProgressStyle::with_template(BAR_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    ProgressBar::with_draw_target(Some(total), ProgressDrawTarget::stderr()).with_style(style)
}
