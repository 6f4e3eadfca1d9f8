use console::{Term, truncate_str};
use std::io::{self, Write};

use super::ProgressSnapshot;

/// Something that can show a progress snapshot.
///
/// Implementations swallow their own I/O errors: a broken display must never
/// affect the run.
pub trait Renderer: Send {
    /// Called once before the first draw
    fn begin(&mut self) {}

    /// Show the latest snapshot
    fn draw(&mut self, snapshot: &ProgressSnapshot);

    /// Final draw, then release whatever the renderer reserved
    fn finish(&mut self, snapshot: &ProgressSnapshot);
}

/// Pick a renderer for the current stdout
pub fn renderer_for(quiet: bool, active_lines: usize) -> Box<dyn Renderer> {
    if quiet {
        return Box::new(SilentRenderer);
    }
    let term = Term::buffered_stdout();
    if term.is_term() {
        Box::new(TerminalRenderer::new(term, active_lines))
    } else {
        Box::new(LogRenderer::new(term))
    }
}

/// Redraws a fixed region of `active_lines + 1` lines in place.
///
/// The cursor always rests at the end of the summary line between draws, so a
/// redraw moves up `active_lines` rows and overwrites every line of the
/// region, never scrolling past it.
pub struct TerminalRenderer {
    term: Term,
    active_lines: usize,
    drawn: bool,
}

impl TerminalRenderer {
    pub fn new(term: Term, active_lines: usize) -> Self {
        Self {
            term,
            active_lines,
            drawn: false,
        }
    }

    fn clear_screen_area(&mut self) -> io::Result<()> {
        // Scroll existing output out of view and start at the top-left corner
        let (rows, _) = self.term.size();
        write!(self.term, "\x1b[{rows}S\x1b[1;1H")?;
        self.term.flush()
    }

    fn redraw(&mut self, snapshot: &ProgressSnapshot) -> io::Result<()> {
        let width = usize::from(self.term.size().1);

        if self.drawn {
            self.term.move_cursor_up(self.active_lines)?;
        }
        for line in 0..self.active_lines {
            self.term.clear_line()?;
            if let Some(dir) = snapshot.active_dirs.get(line) {
                let text = format!("Active: {dir}");
                self.term.write_str(&truncate_str(&text, width, "..."))?;
            }
            self.term.write_str("\n")?;
        }
        self.term.clear_line()?;
        self.term.write_str(&snapshot.summary_line())?;
        self.term.flush()?;

        self.drawn = true;
        Ok(())
    }
}

impl Renderer for TerminalRenderer {
    fn begin(&mut self) {
        let _ = self.clear_screen_area();
    }

    fn draw(&mut self, snapshot: &ProgressSnapshot) {
        let _ = self.redraw(snapshot);
    }

    fn finish(&mut self, snapshot: &ProgressSnapshot) {
        let _ = self.redraw(snapshot);
        let _ = self.term.write_line("");
        let _ = self.term.flush();
    }
}

/// Prints the summary line whenever the counts move; for non-terminal stdout
pub struct LogRenderer {
    term: Term,
    last: Option<(usize, usize, usize)>,
}

impl LogRenderer {
    pub fn new(term: Term) -> Self {
        Self { term, last: None }
    }

    fn counts(snapshot: &ProgressSnapshot) -> (usize, usize, usize) {
        (snapshot.waiting, snapshot.active, snapshot.done)
    }
}

impl Renderer for LogRenderer {
    fn draw(&mut self, snapshot: &ProgressSnapshot) {
        let counts = Self::counts(snapshot);
        if self.last != Some(counts) {
            let _ = self.term.write_line(&snapshot.summary_line());
            let _ = self.term.flush();
            self.last = Some(counts);
        }
    }

    fn finish(&mut self, snapshot: &ProgressSnapshot) {
        self.draw(snapshot);
    }
}

/// Draws nothing
#[derive(Debug, Default)]
pub struct SilentRenderer;

impl Renderer for SilentRenderer {
    fn draw(&mut self, _snapshot: &ProgressSnapshot) {}

    fn finish(&mut self, _snapshot: &ProgressSnapshot) {}
}
