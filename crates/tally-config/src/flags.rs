//! Command-line flag probing

/// Tests if a given option is enabled on the command-line.
///
/// `enabled(args, "skip-slow", None)` checks for a bare `--skip-slow`;
/// a shorthand such as `Some('v')` additionally accepts `-v`. Options that
/// carry a value (`--verbose=1`) do not count as enabled.
pub fn enabled<S: AsRef<str>>(args: &[S], option: &str, shorthand: Option<char>) -> bool {
    let long = format!("--{}", option);

    args.iter().map(AsRef::as_ref).any(|arg| {
        if arg == long {
            return true;
        }

        match (shorthand, arg.strip_prefix('-')) {
            (Some(short), Some(rest)) if !rest.starts_with('-') => {
                let mut chars = rest.chars();
                chars.next() == Some(short) && chars.next().is_none()
            }
            _ => false,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_option() {
        assert!(enabled(&["prog", "--verbose"], "verbose", None));
        assert!(!enabled(&["prog", "--verbosity"], "verbose", None));
    }

    #[test]
    fn test_shorthand() {
        assert!(enabled(&["prog", "-v"], "verbose", Some('v')));
        assert!(!enabled(&["prog", "-v"], "verbose", None));
        assert!(!enabled(&["prog", "-vx"], "verbose", Some('v')));
    }

    #[test]
    fn test_option_with_value_is_not_a_flag() {
        assert!(!enabled(&["prog", "--verbose=1"], "verbose", Some('v')));
    }

    #[test]
    fn test_no_args() {
        let args: [&str; 0] = [];
        assert!(!enabled(&args, "verbose", Some('v')));
    }
}
