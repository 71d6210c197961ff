use std::cell::RefCell;
use std::process::ExitCode;
use std::rc::Rc;

use rdcalc::errors::Diagnostics;
use rdcalc::source::{Source, SourceBuffer};

use self::config::{parse_args_or_exit, RdcalcConfig};
use self::errors::print_diagnostic;

pub mod config;
mod errors;
mod passes;

pub enum RunControl {
    Continue,
    Stop,
}

pub struct PassOutput<O> {
    pub output: O,
    pub run_control: RunControl,
}

impl<O> PassOutput<O> {
    pub fn stop_with_output(output: O) -> Self {
        Self {
            output,
            run_control: RunControl::Stop,
        }
    }

    pub fn continue_with_output(output: O) -> Self {
        Self {
            output,
            run_control: RunControl::Continue,
        }
    }
}

impl PassOutput<()> {
    pub fn r#continue() -> Self {
        Self::continue_with_output(())
    }
}

pub struct RunnerCtx<'buf, 'emt> {
    pub config: RdcalcConfig,
    pub source: Rc<RefCell<Source<'buf>>>,
    pub diagnostics: Diagnostics<'emt>,
}

impl RunnerCtx<'_, '_> {
    pub fn stop_if_errors<O>(&self, output: O) -> PassOutput<O> {
        PassOutput {
            output,
            run_control: if self.diagnostics.has_errors() {
                RunControl::Stop
            } else {
                RunControl::Continue
            },
        }
    }

    fn exit_code(&self) -> ExitCode {
        if self.diagnostics.has_errors() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }
}

macro_rules! return_if_stopped {
    ($ctx:expr, $e:expr) => {
        match $e {
            PassOutput {
                run_control: RunControl::Stop,
                ..
            } => return $ctx.exit_code(),

            PassOutput { output, .. } => output,
        }
    };
}

fn run(mut ctx: RunnerCtx<'_, '_>) -> ExitCode {
    return_if_stopped!(ctx, passes::load_inputs(&mut ctx));

    // lexical analysis
    let lexers = return_if_stopped!(ctx, passes::scan_inputs(&mut ctx));
    let lexers = return_if_stopped!(ctx, passes::dump_tokens_if_asked(&mut ctx, lexers));

    // evaluation
    let results = return_if_stopped!(ctx, passes::evaluate_all(&mut ctx, lexers));
    return_if_stopped!(ctx, passes::print_results(&mut ctx, results));

    ctx.exit_code()
}

pub fn prepare_and_run() -> ExitCode {
    let config = parse_args_or_exit();
    let mut source_buf = SourceBuffer::new();
    let source = Rc::new(RefCell::new(Source::new(&mut source_buf)));

    let mut diagnostics = Diagnostics::new();

    diagnostics.set_emitter({
        let source = source.clone();

        Box::new(move |diagnostic| {
            print_diagnostic(&source.borrow(), diagnostic);
        })
    });

    let ctx = RunnerCtx {
        config,
        source,
        diagnostics,
    };

    run(ctx)
}
