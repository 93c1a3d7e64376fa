pub type CmdResult<T> = textpatch::Result<(T, i32)>;

pub(crate) struct GlobalArgs {}

pub mod config;
pub mod run;

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (textpatch::Result<serde_json::Value>, i32) {
    match command {
        crate::Commands::Run(args) => {
            crate::tty::status("textpatch is working...");
            dispatch!(args, global, run)
        }
        crate::Commands::Config(args) => dispatch!(args, global, config),
    }
}
