//! Styled terminal output for the fileflow CLI
//!
//! Results and summaries go to stdout, errors to stderr. Quiet mode keeps
//! errors only.

use console::style;

/// Output handler for consistent CLI formatting
pub struct Output {
    verbose: bool,
    quiet: bool,
}

impl Output {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("✔").green(), message);
        }
    }

    /// Errors are shown even in quiet mode
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✖").red(), message);
    }

    pub fn warning(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("⚠").yellow(), message);
        }
    }

    /// Only printed with `-v`
    pub fn verbose(&self, message: &str) {
        if self.verbose && !self.quiet {
            println!("{} {}", style("ℹ").dim(), style(message).dim());
        }
    }

    pub fn header(&self, title: &str) {
        if !self.quiet {
            println!("\n{}", style(title).bold().underlined());
        }
    }

    pub fn table_row(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {:<24} {}", style(key).dim(), value);
        }
    }

    /// Print a key-value pair, highlighted in green or red
    pub fn status_row(&self, key: &str, value: &str, ok: bool) {
        if !self.quiet {
            let styled_value = if ok {
                style(value).green().bold()
            } else {
                style(value).red().bold()
            };
            println!("  {:<24} {}", style(key).dim(), styled_value);
        }
    }

    /// Raw text such as a serialized config, printed regardless of verbosity
    pub fn plain(&self, text: &str) {
        println!("{text}");
    }
}
