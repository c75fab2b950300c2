use cassia_workflow::StyledLine;
use cassia_workflow::Tone;
use owo_colors::OwoColorize;
use supports_color::Stream;

/// Maps rendered line tones to terminal colours.
#[derive(Debug, Clone)]
pub struct Painter {
    enabled: bool,
}

impl Painter {
    /// `preference` comes from the `color` config key; `None` asks the
    /// terminal.
    pub fn detect(preference: Option<bool>, stream: Stream) -> Self {
        let enabled = preference.unwrap_or_else(|| supports_color::on(stream).is_some());
        Self { enabled }
    }

    pub fn paint(&self, line: &StyledLine) -> String {
        let text = line.text.as_str();
        if !self.enabled || text.is_empty() {
            return text.to_string();
        }
        match line.tone {
            Tone::Plain => text.to_string(),
            Tone::Title => text.bold().to_string(),
            Tone::Heading => text.cyan().bold().to_string(),
            Tone::Accent => text.magenta().to_string(),
            Tone::Muted => text.dimmed().to_string(),
            Tone::Success => text.green().to_string(),
            Tone::Warning => text.yellow().to_string(),
            Tone::Failure => text.red().bold().to_string(),
        }
    }

    pub fn paint_all(&self, lines: &[StyledLine]) -> String {
        let mut out = String::new();
        for line in lines {
            out.push_str(&self.paint(line));
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn plain_painter_leaves_text_alone() {
        let lines = vec![
            StyledLine::new(Tone::Heading, "Validation Check"),
            StyledLine::new(Tone::Success, "VALIDATION PASSED"),
        ];
        assert_eq!(
            Painter::detect(Some(false), Stream::Stdout).paint_all(&lines),
            "Validation Check\nVALIDATION PASSED\n"
        );
    }

    #[test]
    fn enabled_painter_emits_escape_codes() {
        let painter = Painter::detect(Some(true), Stream::Stdout);
        let painted = painter.paint(&StyledLine::new(Tone::Failure, "VALIDATION FAILED"));
        assert!(painted.contains("\u{1b}["));
        assert!(painted.contains("VALIDATION FAILED"));
    }
}
