use owo_colors::{OwoColorize, Stream};

use rdcalc::errors::{Diagnostic, DiagnosticMessage, Level};
use rdcalc::position::Span;
use rdcalc::source::Source;

fn format_level(level: Level) -> String {
    match level {
        Level::Fatal => format!(
            "{}",
            "FATAL".if_supports_color(Stream::Stderr, |text| text.red())
        ),

        Level::Error => format!(
            "{}",
            "ERROR".if_supports_color(Stream::Stderr, |text| text.bright_red())
        ),

        Level::Warn => format!(
            "{}",
            "WARN ".if_supports_color(Stream::Stderr, |text| text.yellow())
        ),
    }
}

fn format_span(src: &Source<'_>, span: Option<&Span>) -> String {
    match span {
        None => "".to_owned(),
        Some(span) => format!("{} ", span.display(src)),
    }
}

pub fn print_diagnostic(src: &Source<'_>, diagnostic: &Diagnostic) {
    let Diagnostic {
        level,
        message: DiagnosticMessage { span, message },
        source,
    } = diagnostic;

    let level = format_level(*level);
    let span = format_span(src, span.as_ref());

    match source {
        // unspanned diagnostics wrap an io error or the like: show the cause
        Some(source) if span.is_empty() => eprintln!("{} {}: {}", level, message, source),
        _ => eprintln!("{} {}{}", level, span, message),
    }
}
