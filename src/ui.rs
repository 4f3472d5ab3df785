//! Terminal UI for batch summarization, rendered via `indicatif`.
//!
//! Two bars are stacked vertically: a document bar tracking how many
//! documents have completed, and a step spinner showing what the
//! pipeline is doing inside the current document (outline pass, chunk
//! N of M, compression).

use console::style;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

pub struct SummarizeUi {
    multi: MultiProgress,
    doc_bar: ProgressBar,
    step_bar: ProgressBar,
    verbose: bool,
}

impl SummarizeUi {
    /// Create the UI with `total_docs` sizing the document bar.
    pub fn new(total_docs: u64, verbose: bool) -> Self {
        let multi = MultiProgress::new();
        Self::build(multi, total_docs, verbose)
    }

    /// A UI that draws nothing. Used by tests and by `summarize --stdout`
    /// so progress noise never mixes with piped output.
    pub fn hidden() -> Self {
        let multi = MultiProgress::with_draw_target(ProgressDrawTarget::hidden());
        Self::build(multi, 0, false)
    }

    fn build(multi: MultiProgress, total_docs: u64, verbose: bool) -> Self {
        let doc_style = ProgressStyle::default_bar()
            .template("{prefix:.bold.dim} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("progress bar template is a valid static string")
            .progress_chars("█▓▒░");

        let doc_bar = multi.add(ProgressBar::new(total_docs));
        doc_bar.set_style(doc_style);
        doc_bar.set_prefix("Docs");

        let step_style = ProgressStyle::default_spinner()
            .template("{prefix:.bold.dim} {spinner} {msg}")
            .expect("progress bar template is a valid static string");

        let step_bar = multi.add(ProgressBar::new_spinner());
        step_bar.set_style(step_style);
        step_bar.set_prefix("Step");
        step_bar.enable_steady_tick(Duration::from_millis(100));

        Self {
            multi,
            doc_bar,
            step_bar,
            verbose,
        }
    }

    pub fn start_document(&self, name: &str, tier: &str, units: usize) {
        self.doc_bar.set_message(name.to_string());
        self.step_bar
            .set_message(format!("analyzing ({} units, {} tier)", units, tier));
        if self.verbose {
            let line = format!(
                "{} {} — {} units, {} strategy",
                style("Processing").cyan().bold(),
                name,
                units,
                tier
            );
            let _ = self.multi.println(line);
        }
    }

    pub fn outline_pass(&self) {
        self.step_bar.set_message("extracting outline".to_string());
    }

    pub fn chunk(&self, index: usize, total: usize) {
        self.step_bar
            .set_message(format!("summarizing chunk {}/{}", index, total));
    }

    pub fn compressing(&self) {
        self.step_bar
            .set_message("compressing running summary".to_string());
    }

    pub fn document_done(&self, name: &str) {
        self.doc_bar.inc(1);
        if self.verbose {
            let _ = self
                .multi
                .println(format!("{} {}", style("Summarized").green(), name));
        }
    }

    pub fn document_skipped(&self, name: &str, cause: &str) {
        self.doc_bar.inc(1);
        let _ = self.multi.println(format!(
            "{} {} ({})",
            style("Skipped").yellow().bold(),
            name,
            cause
        ));
    }

    pub fn finish(&self, summarized: usize, skipped: usize) {
        self.step_bar.finish_and_clear();
        self.doc_bar.finish_and_clear();
        let _ = self.multi.println(format!(
            "{} {} summarized, {} skipped",
            style("Done:").green().bold(),
            summarized,
            skipped
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_ui_accepts_all_events() {
        let ui = SummarizeUi::hidden();
        ui.start_document("a.txt", "brief", 100);
        ui.outline_pass();
        ui.chunk(1, 3);
        ui.compressing();
        ui.document_done("a.txt");
        ui.document_skipped("b.txt", "unreadable");
        ui.finish(1, 1);
    }
}
