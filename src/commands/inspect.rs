use std::path::PathBuf;

use crate::args::{self, ArgList};
use crate::error::TerraformError;
use crate::outcome::TerraformResult;
use crate::terraform::{Invocation, Terraform};

#[derive(Debug, Default, Clone)]
pub struct ValidateOptions {
    pub color: Option<bool>,
    pub chdir: Option<PathBuf>,
}

#[derive(Debug, Default, Clone)]
pub struct FmtOptions {
    pub check: Option<bool>,
    pub recursive: Option<bool>,
    pub diff: Option<bool>,
    /// Directory or file to format instead of the working directory.
    pub target: Option<String>,
    pub color: Option<bool>,
    pub chdir: Option<PathBuf>,
}

#[derive(Debug, Default, Clone)]
pub struct ShowOptions {
    /// Saved plan or state file. Current state when unset.
    pub path: Option<String>,
    pub chdir: Option<PathBuf>,
}

#[derive(Debug, Default, Clone)]
pub struct OutputOptions {
    /// Single output to read. All outputs when unset.
    pub name: Option<String>,
    pub state: Option<String>,
    pub chdir: Option<PathBuf>,
}

fn decode_json(
    inv: &Invocation,
    subcommand: &str,
) -> Result<serde_json::Value, TerraformError> {
    serde_json::from_str(&inv.stdout)
        .map_err(|e| TerraformError::parse(subcommand, inv.command_line.clone(), e))
}

impl Terraform {
    pub fn validate(&self, opts: &ValidateOptions) -> Result<TerraformResult<String>, TerraformError> {
        let mut args = ArgList::new(&["validate"]);
        args.flag(self.color_flag(opts.color));

        let inv = self.run(&args, "validate", opts.chdir.as_deref(), false)?;
        Ok(TerraformResult::ok(inv.stdout))
    }

    /// With `check`, unformatted files make terraform exit non-zero and this
    /// returns the error; stdout then lists the offending files.
    pub fn fmt(&self, opts: &FmtOptions) -> Result<TerraformResult<String>, TerraformError> {
        let mut args = ArgList::new(&["fmt"]);
        args.flag(args::switch("check", opts.check))
            .flag(args::switch("recursive", opts.recursive))
            .flag(args::switch("diff", opts.diff))
            .flag(self.color_flag(opts.color));
        if let Some(target) = &opts.target {
            args.positional(target.as_str());
        }

        let inv = self.run(&args, "fmt", opts.chdir.as_deref(), false)?;
        Ok(TerraformResult::ok(inv.stdout))
    }

    /// `terraform show -json`, decoded.
    pub fn show(&self, opts: &ShowOptions) -> Result<TerraformResult<serde_json::Value>, TerraformError> {
        let mut args = ArgList::new(&["show", "-json"]);
        if let Some(path) = &opts.path {
            args.positional(path.as_str());
        }

        let inv = self.run(&args, "show", opts.chdir.as_deref(), false)?;
        Ok(TerraformResult::ok(decode_json(&inv, "show")?))
    }

    /// `terraform output -json`, decoded.
    pub fn output(
        &self,
        opts: &OutputOptions,
    ) -> Result<TerraformResult<serde_json::Value>, TerraformError> {
        let mut args = ArgList::new(&["output", "-json"]);
        args.flag(args::text("state", opts.state.as_deref()));
        if let Some(name) = &opts.name {
            args.positional(name.as_str());
        }

        let inv = self.run(&args, "output", opts.chdir.as_deref(), false)?;
        Ok(TerraformResult::ok(decode_json(&inv, "output")?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::testutil::fake_terraform;

    #[test]
    fn validate_passes_color() {
        let tmp = tempfile::tempdir().unwrap();
        let (tf, fake) = fake_terraform(tmp.path());
        fake.ok("Success! The configuration is valid.\n");

        let opts = ValidateOptions {
            color: Some(false),
            ..Default::default()
        };
        let res = tf.validate(&opts).unwrap();
        assert!(res.result.contains("Success"));
        assert_eq!(fake.args(0), vec!["validate", "-no-color"]);
    }

    #[test]
    fn fmt_check_recursive_target() {
        let tmp = tempfile::tempdir().unwrap();
        let (tf, fake) = fake_terraform(tmp.path());
        fake.ok("");

        let opts = FmtOptions {
            check: Some(true),
            recursive: Some(true),
            target: Some("modules".to_string()),
            ..Default::default()
        };
        tf.fmt(&opts).unwrap();
        assert_eq!(
            fake.args(0),
            vec!["fmt", "-check", "-recursive", "modules"]
        );
    }

    #[test]
    fn fmt_check_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let (tf, fake) = fake_terraform(tmp.path());
        fake.fail("");

        let opts = FmtOptions {
            check: Some(true),
            ..Default::default()
        };
        let err = tf.fmt(&opts).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Failed);
        assert_eq!(err.subcommand(), "fmt");
    }

    #[test]
    fn show_decodes_json() {
        let tmp = tempfile::tempdir().unwrap();
        let (tf, fake) = fake_terraform(tmp.path());
        fake.ok(r#"{"format_version":"1.0","values":{"outputs":{"output":{"value":"success"}}}}"#);

        let res = tf.show(&ShowOptions::default()).unwrap();
        assert_eq!(res.result["format_version"], "1.0");
        assert_eq!(res.result["values"]["outputs"]["output"]["value"], "success");
        assert_eq!(fake.args(0), vec!["show", "-json"]);
    }

    #[test]
    fn show_saved_plan() {
        let tmp = tempfile::tempdir().unwrap();
        let (tf, fake) = fake_terraform(tmp.path());
        fake.ok("{}");

        let opts = ShowOptions {
            path: Some("tfplan".to_string()),
            ..Default::default()
        };
        tf.show(&opts).unwrap();
        assert_eq!(fake.args(0), vec!["show", "-json", "tfplan"]);
    }

    #[test]
    fn show_invalid_json_is_parse_error() {
        let tmp = tempfile::tempdir().unwrap();
        let (tf, fake) = fake_terraform(tmp.path());
        fake.ok("No state.\n");

        let err = tf.show(&ShowOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert_eq!(err.command_line(), Some("terraform show -json"));
    }

    #[test]
    fn output_single_value() {
        let tmp = tempfile::tempdir().unwrap();
        let (tf, fake) = fake_terraform(tmp.path());
        fake.ok("\"10.0.0.0/16\"\n");

        let opts = OutputOptions {
            name: Some("vpc_cidr".to_string()),
            ..Default::default()
        };
        let res = tf.output(&opts).unwrap();
        assert_eq!(res.result, serde_json::json!("10.0.0.0/16"));
        assert_eq!(fake.args(0), vec!["output", "-json", "vpc_cidr"]);
    }

    #[test]
    fn output_all_values() {
        let tmp = tempfile::tempdir().unwrap();
        let (tf, fake) = fake_terraform(tmp.path());
        fake.ok(r#"{"vpc_id":{"sensitive":false,"type":"string","value":"vpc-123"}}"#);

        let res = tf.output(&OutputOptions::default()).unwrap();
        assert_eq!(res.result["vpc_id"]["value"], "vpc-123");
    }
}
