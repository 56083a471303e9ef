#[cfg(test)]
mod tests {
    use iface_adapter::wast::run_script;
    use rstest::rstest;
    use std::path::PathBuf;

    /*
     * Adapter script runner.
     *
     * Every .wast file under tests/scripts is parsed and run against the
     * default configuration. A file passes when no assertion fails and no
     * command was skipped behind a module that failed to load.
     */

    fn run_script_file(path: &PathBuf) {
        let file_name = path.file_name().unwrap().to_string_lossy().to_string();
        let source = std::fs::read_to_string(path).unwrap_or_else(|e| panic!("{file_name}: read failed: {e}"));
        let report = run_script(&source).unwrap_or_else(|e| panic!("{file_name}: parse failed: {e}"));

        if report.passed() {
            println!(
                "PASS {file_name}: {} modules, {} assert_return, {} assert_trap, \
                 {} assert_invalid, {} assert_malformed, {} actions",
                report.modules,
                report.assert_return,
                report.assert_trap,
                report.assert_invalid,
                report.assert_malformed,
                report.actions,
            );
        } else {
            let skipped_msg = if report.skipped > 0 {
                format!(", {} skipped", report.skipped)
            } else {
                String::new()
            };
            panic!(
                "FAIL {file_name}: {} passed, {} failed{skipped_msg}\n  {}",
                report.assertions(),
                report.failures.len(),
                report.failures.join("\n  ")
            );
        }
        assert!(report.assertions() > 0, "{file_name}: no assertions ran");
    }

    #[rstest]
    fn test_adapter_scripts(#[files("tests/scripts/*.wast")] path: PathBuf) {
        run_script_file(&path);
    }
}
