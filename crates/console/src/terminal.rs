/// Switches the Windows console into virtual terminal mode so colour and
/// cursor escapes are interpreted. Returns `false` when that is not possible.
pub fn enable_ansi() -> bool {
    #[cfg(windows)]
    {
        crossterm::ansi_support::supports_ansi()
    }
    #[cfg(not(windows))]
    {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(windows))]
    #[test]
    fn test_ansi_always_available_off_windows() {
        assert!(enable_ansi());
    }
}
