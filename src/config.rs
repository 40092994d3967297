use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use clap::{ArgAction, Parser};

/// Long flags that may also be spelled with a single dash.
const LONG_FLAGS: &[&str] = &["logDir", "logName", "separateByYear", "seperateByYear"];

/// Command line flags.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "monthrotate", version, about = "Append piped lines to monthly rotating log files")]
pub struct Config {
    /// Path to log directory
    #[arg(long = "logDir", default_value = "")]
    pub log_dir: String,

    /// Name of each log file
    #[arg(long = "logName", default_value = "")]
    pub log_name: String,

    /// Separate log files into a directory per year
    #[arg(
        long = "separateByYear",
        alias = "seperateByYear",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true"
    )]
    pub separate_by_year: bool,
}

impl Config {
    /// Parse flags, accepting `-logDir x` and `-separateByYear=true` as well
    /// as the `--` forms.
    pub fn from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(single_dash_to_long(args))
    }

    /// Base directory with trailing separators and `.` segments removed.
    /// An empty value means the current directory.
    pub fn base_dir(&self) -> PathBuf {
        let normalized: PathBuf = Path::new(&self.log_dir).components().collect();
        if normalized.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            normalized
        }
    }
}

fn single_dash_to_long<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut after_terminator = false;
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if after_terminator {
                return arg;
            }
            let rewritten = match arg.to_str() {
                Some("--") => {
                    after_terminator = true;
                    None
                }
                Some(flag) if is_single_dash_long(flag) => Some(OsString::from(format!("-{flag}"))),
                _ => None,
            };
            rewritten.unwrap_or(arg)
        })
        .collect()
}

fn is_single_dash_long(arg: &str) -> bool {
    match arg.strip_prefix('-') {
        Some(rest) if !rest.starts_with('-') => {
            let name = rest.split_once('=').map_or(rest, |(name, _)| name);
            LONG_FLAGS.contains(&name)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["monthrotate"]).unwrap();
        assert_eq!(config.log_dir, "");
        assert_eq!(config.log_name, "");
        assert!(!config.separate_by_year);
        assert_eq!(config.base_dir(), PathBuf::from("."));
    }

    #[test]
    fn test_all_flags() {
        let config = Config::try_parse_from([
            "monthrotate",
            "--logDir",
            "/var/log/app/",
            "--logName",
            "svc",
            "--separateByYear",
        ])
        .unwrap();
        assert_eq!(config.log_name, "svc");
        assert!(config.separate_by_year);
        assert_eq!(config.base_dir(), PathBuf::from("/var/log/app"));
    }

    #[test]
    fn test_misspelled_year_flag_alias() {
        let config = Config::try_parse_from(["monthrotate", "--seperateByYear"]).unwrap();
        assert!(config.separate_by_year);
    }

    #[test]
    fn test_single_dash_flags() {
        let config = Config::from_args([
            "monthrotate",
            "-logDir",
            "/x",
            "-logName",
            "svc",
            "-seperateByYear=true",
        ])
        .unwrap();
        assert_eq!(config.log_dir, "/x");
        assert_eq!(config.log_name, "svc");
        assert!(config.separate_by_year);
    }

    #[test]
    fn test_single_dash_bare_year_flag() {
        let config = Config::from_args(["monthrotate", "-seperateByYear", "-logName=svc"]).unwrap();
        assert!(config.separate_by_year);
        assert_eq!(config.log_name, "svc");
    }

    #[test]
    fn test_year_flag_takes_explicit_value() {
        let on = Config::from_args(["monthrotate", "--separateByYear=true"]).unwrap();
        assert!(on.separate_by_year);

        let off = Config::from_args(["monthrotate", "--separateByYear=false", "--logName", "svc"])
            .unwrap();
        assert!(!off.separate_by_year);
        assert_eq!(off.log_name, "svc");
    }

    #[test]
    fn test_unknown_single_dash_flag_is_rejected() {
        assert!(Config::from_args(["monthrotate", "-logDirectory", "/x"]).is_err());
    }

    #[test]
    fn test_arguments_after_terminator_are_untouched() {
        let args = single_dash_to_long(["monthrotate", "--", "-logDir"]);
        assert_eq!(args, ["monthrotate", "--", "-logDir"]);
    }

    #[test]
    fn test_base_dir_normalizes_separators() {
        let config = Config {
            log_dir: "logs//nested/./".into(),
            ..Default::default()
        };
        assert_eq!(config.base_dir(), PathBuf::from("logs/nested"));
    }
}
