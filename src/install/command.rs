//! Installer command-line construction.

use crate::InstallRequest;
use std::ffi::OsString;

/// Build the argument list for the install invocation.
///
/// Token order is fixed: `-m <module> install <package> --target <dir>`
/// followed by the extra arguments verbatim. The package name comes before
/// any option flags, and the target flag is always present.
pub(crate) fn install_args(request: &InstallRequest, module: &str) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "-m".into(),
        module.into(),
        "install".into(),
        request.package_name().into(),
        "--target".into(),
        request.target_directory().into(),
    ];
    args.extend(request.extra_arguments().iter().map(OsString::from));
    args
}

/// Render a command line for logging. Lossy on non-UTF-8 paths, which is
/// fine for diagnostics.
pub(crate) fn display_command(program: &std::path::Path, args: &[OsString]) -> String {
    let mut out = program.display().to_string();
    for arg in args {
        out.push(' ');
        out.push_str(&arg.to_string_lossy());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate;
    use std::path::Path;

    fn tokens(request: &InstallRequest) -> Vec<String> {
        install_args(request, "pip")
            .into_iter()
            .map(|t| t.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_token_order() {
        let request = validate("requests", Some(Path::new("/tmp/libs")), "").unwrap();
        assert_eq!(
            tokens(&request),
            ["-m", "pip", "install", "requests", "--target", "/tmp/libs"]
        );
    }

    #[test]
    fn test_extra_arguments_follow_target_flag() {
        let request =
            validate("requests", Some(Path::new("/tmp/libs")), "--no-deps --pre").unwrap();
        let tokens = tokens(&request);
        assert_eq!(&tokens[tokens.len() - 2..], ["--no-deps", "--pre"]);
        assert_eq!(&tokens[4..6], ["--target", "/tmp/libs"]);
    }

    #[test]
    fn test_pinned_package_stays_one_token() {
        let request = validate("requests", Some(Path::new("/tmp/libs")), "")
            .unwrap()
            .pin_version("2.31.0");
        assert_eq!(tokens(&request)[3], "requests==2.31.0");
    }

    #[test]
    fn test_module_name_is_honored() {
        let request = validate("requests", Some(Path::new("/tmp/libs")), "").unwrap();
        let args = install_args(&request, "uv");
        assert_eq!(args[1], OsString::from("uv"));
    }

    #[test]
    fn test_display_command_joins_tokens() {
        let request = validate("requests", Some(Path::new("/tmp/libs")), "--no-deps").unwrap();
        let args = install_args(&request, "pip");
        let rendered = display_command(Path::new("/usr/bin/python3"), &args);
        assert_eq!(
            rendered,
            "/usr/bin/python3 -m pip install requests --target /tmp/libs --no-deps"
        );
    }
}
