use timepat::ParseDetails;

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_run(pattern: &str, input: &str, details: &ParseDetails, color: bool) {
    let palette = ansi::Palette::new(color);
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Decoding: \"{input}\""), ansi::CYAN)));
    println!("{}", palette.dim(format!("   pattern: \"{pattern}\"")));

    println!("\n{}", palette.paint("━━━ Tokens ━━━", ansi::GRAY));
    let token_width = details.spans.iter().map(|s| s.token.len()).max().unwrap_or(0);
    for span in &details.spans {
        // Pad before painting so escape codes don't skew the columns.
        let token = format!("{:<token_width$}", span.token);
        println!(
            "  {}  {}  {:?}",
            palette.paint(token, ansi::CYAN),
            palette.dim(format!("{:>3}..{:<3}", span.start, span.end)),
            span.text,
        );
    }

    println!("\n{}", palette.paint("━━━ Result ━━━", ansi::GRAY));
    println!("  {}", palette.bold(palette.paint(details.value.to_rfc3339(), ansi::GREEN)));

    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    println!("  Total: {}", palette.paint(format!("{:?}", details.elapsed), ansi::GREEN));
    println!();
}
