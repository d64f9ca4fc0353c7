// `golden` tool: cleans testdata trees and builds txtar snapshots.
// Usage: golden <clean|snapshot|init|join|diff> ...

fn main() {
    golden::logging::init_cli();
    std::process::exit(golden::cli::run());
}
