use std::io::{self, Write};
use std::path::PathBuf;

use tracing::{debug, info_span};

use rdcalc::dump::dump_tokens;
use rdcalc::errors::DiagnosticMessage;
use rdcalc::parse::{Cursor, Lexer, Parser};
use rdcalc::position::PositionPath;
use rdcalc::source::SourceId;
use rdcalc::util::CloneStatic;

use super::config::{EvalOutputFormat, OutputKind, TrailingInput};
use super::{PassOutput, RunnerCtx};

pub fn load_inputs(ctx: &mut RunnerCtx<'_, '_>) -> PassOutput<()> {
    for (idx, expr) in ctx.config.exprs.iter().enumerate() {
        let name = PathBuf::from(format!("<arg {}>", idx + 1));
        ctx.source
            .borrow_mut()
            .load_from_string(name, expr.as_bytes().to_vec());
    }

    for path in &ctx.config.paths {
        let result = ctx.source.borrow_mut().load(path.clone());

        if let Err(e) = result {
            ctx.diagnostics
                .error()
                .with_message(format!("could not load file {}", path.display()))
                .with_source(Box::new(e))
                .emit();
        }
    }

    if ctx.config.exprs.is_empty() && ctx.config.paths.is_empty() {
        let result = ctx
            .source
            .borrow_mut()
            .load_from_reader("<stdin>".into(), io::stdin().lock());

        if let Err(e) = result {
            ctx.diagnostics
                .fatal()
                .with_message("could not read the standard input".to_owned())
                .with_source(Box::new(e))
                .emit();
        }
    }

    ctx.stop_if_errors(())
}

pub fn scan_inputs<'buf>(ctx: &mut RunnerCtx<'buf, '_>) -> PassOutput<Vec<(SourceId, Lexer<'buf>)>> {
    let lexers = ctx
        .source
        .borrow()
        .iter()
        .map(|src_file| (src_file.id(), Lexer::new(Cursor::new(src_file))))
        .collect();

    PassOutput::continue_with_output(lexers)
}

pub fn dump_tokens_if_asked<'buf>(
    ctx: &mut RunnerCtx<'buf, '_>,
    mut lexers: Vec<(SourceId, Lexer<'buf>)>,
) -> PassOutput<Vec<(SourceId, Lexer<'buf>)>> {
    let OutputKind::Lexer(format) = ctx.config.output else {
        return PassOutput::continue_with_output(lexers);
    };

    for (_, lexer) in lexers.drain(..) {
        let result = dump_tokens(format, &ctx.source.borrow(), lexer, io::stdout().lock());

        if let Err(e) = result {
            ctx.diagnostics
                .error()
                .with_message("could not dump the tokens to stdout".to_owned())
                .with_source(Box::new(e))
                .emit();
        }
    }

    PassOutput::stop_with_output(lexers)
}

pub fn evaluate_all<'buf>(
    ctx: &mut RunnerCtx<'buf, '_>,
    lexers: Vec<(SourceId, Lexer<'buf>)>,
) -> PassOutput<Vec<(SourceId, i32)>> {
    let mut results = Vec::with_capacity(lexers.len());

    for (source_id, lexer) in lexers {
        let _span = info_span!("evaluate", ?source_id).entered();
        let parser = Parser::new(lexer);

        let result = match ctx.config.trailing_input {
            TrailingInput::Reject => parser.evaluate(),

            TrailingInput::Warn => parser.evaluate_prefix().map(|(value, rest)| {
                if !rest.is_eof() {
                    ctx.diagnostics
                        .warn()
                        .with_message(DiagnosticMessage::with_span(
                            rest.span.clone(),
                            format!("ignoring the input starting with {}", rest),
                        ))
                        .emit();
                }

                value
            }),
        };

        match result {
            Ok(value) => {
                debug!(value, "evaluated");
                results.push((source_id, value));
            }

            Err(e) => {
                ctx.diagnostics
                    .error()
                    .with_span_and_error(e.clone_static())
                    .emit();
            }
        }
    }

    // inputs that did evaluate are still printed
    PassOutput::continue_with_output(results)
}

pub fn print_results(
    ctx: &mut RunnerCtx<'_, '_>,
    results: Vec<(SourceId, i32)>,
) -> PassOutput<()> {
    let OutputKind::Eval(format) = ctx.config.output else {
        return PassOutput::r#continue();
    };

    let source = ctx.source.borrow();
    let mut out = io::stdout().lock();

    let result = results.iter().try_for_each(|&(source_id, value)| match format {
        EvalOutputFormat::Plain => writeln!(out, "{}", value),

        EvalOutputFormat::Debug => {
            writeln!(out, "{}: {}", PositionPath::new(Some(source_id), &source), value)
        }
    });

    drop(source);

    if let Err(e) = result {
        ctx.diagnostics
            .error()
            .with_message("could not write the results to stdout".to_owned())
            .with_source(Box::new(e))
            .emit();
    }

    PassOutput::r#continue()
}
