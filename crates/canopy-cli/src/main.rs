/// Main entry point - testable version
fn main() {
    let result = main_impl();
    if let Err(code) = result {
        std::process::exit(code);
    }
}

/// Testable main implementation that returns exit code instead of calling exit
fn main_impl() -> Result<(), i32> {
    main_impl_with_cli(canopy_cli::run_cli)
}

/// Main implementation with injectable CLI function for testing
fn main_impl_with_cli<F>(cli_fn: F) -> Result<(), i32>
where
    F: FnOnce() -> Result<(), Box<dyn std::error::Error>>,
{
    match cli_fn() {
        Ok(_) => Ok(()),
        Err(e) => {
            eprintln!("Error: {e}");
            Err(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn main_impl_with_cli_maps_success_to_ok() {
        let result = main_impl_with_cli(|| Ok(()));
        assert!(result.is_ok());
    }

    #[test]
    fn main_impl_with_cli_maps_error_to_exit_code_one() {
        let result = main_impl_with_cli(|| Err("boom".into()));
        assert_eq!(result, Err(1));
    }
}
