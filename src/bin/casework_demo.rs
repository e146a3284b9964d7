// Demo harness binary: the stack and hook cases are registered up front,
// the broken examples only join when their directory is scanned.
// Usage: cargo run --bin casework-demo -- [--case NAME | --dir [PATH]]

use std::path::PathBuf;
use std::process::ExitCode;

use casework::{cli, CaseRegistry, HarnessConfig, PluginCatalog};

#[path = "../../demos/cases/test_broken.rs"]
mod test_broken;
#[path = "../../demos/cases/test_hooks.rs"]
mod test_hooks;
#[path = "../../demos/cases/test_stack.rs"]
mod test_stack;

fn main() -> ExitCode {
    let catalog = PluginCatalog::new()
        .with("test_broken", test_broken::register)
        .with("test_hooks", test_hooks::register)
        .with("test_stack", test_stack::register);

    let mut registry = CaseRegistry::new();
    test_hooks::register(&mut registry);
    test_stack::register(&mut registry);

    let defaults = HarnessConfig {
        test_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/demos/cases")),
        ..HarnessConfig::default()
    };
    cli::run_with_defaults(registry, &catalog, defaults)
}
