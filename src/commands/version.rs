use crate::args::ArgList;
use crate::error::TerraformError;
use crate::outcome::TerraformResult;
use crate::terraform::Terraform;
use crate::version::VersionInfo;

impl Terraform {
    /// Runs `terraform version -json` and caches the parsed result on the
    /// handle.
    pub fn version(&mut self) -> Result<TerraformResult<VersionInfo>, TerraformError> {
        let args = ArgList::new(&["version", "-json"]);
        let inv = self.run(&args, "version", None, true)?;
        let info = VersionInfo::parse_json(&inv.stdout)
            .map_err(|e| TerraformError::parse("version", inv.command_line.clone(), e))?;

        tracing::debug!(version = %info.version_str, platform = %info.platform, "detected terraform");
        self.set_version(info.clone());
        Ok(TerraformResult::ok(info))
    }

    /// Cached version info, running detection on first use.
    pub fn detected_version(&mut self) -> Result<&VersionInfo, TerraformError> {
        let info = match self.cached_version() {
            Some(info) => info.clone(),
            None => self.version()?.into_inner(),
        };
        Ok(self.set_version(info))
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ErrorKind;
    use crate::testutil::{fake_terraform, version_json};

    #[test]
    fn version_parses_and_caches() {
        let tmp = tempfile::tempdir().unwrap();
        let (mut tf, fake) = fake_terraform(tmp.path());
        fake.ok(&version_json("1.5.2"));

        let res = tf.version().unwrap();
        assert!(res.success);
        assert_eq!(res.result.version_str, "1.5.2");
        assert_eq!(res.result.major, 1);
        assert_eq!(res.result.minor, 5);
        assert_eq!(res.result.patch, 2);
        assert!(res.result.latest);
        assert_eq!(res.result.platform, "linux_amd64");
        assert_eq!(tf.cached_version(), Some(&res.result));
        assert_eq!(fake.args(0), vec!["version", "-json"]);
    }

    #[test]
    fn detected_version_runs_once() {
        let tmp = tempfile::tempdir().unwrap();
        let (mut tf, fake) = fake_terraform(tmp.path());
        fake.ok(&version_json("1.3.0"));

        assert_eq!(tf.detected_version().unwrap().minor, 3);
        assert_eq!(tf.detected_version().unwrap().minor, 3);
        assert_eq!(fake.call_count(), 1);
    }

    #[test]
    fn version_unparseable_output() {
        let tmp = tempfile::tempdir().unwrap();
        let (mut tf, fake) = fake_terraform(tmp.path());
        fake.ok("Terraform v1.5.2\non linux_amd64\n");

        let err = tf.version().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert_eq!(err.command_line(), Some("terraform version -json"));
        assert!(tf.cached_version().is_none());
    }

    #[test]
    fn version_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let (mut tf, fake) = fake_terraform(tmp.path());
        fake.fail("boom\n");

        let err = tf.detected_version().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Failed);
        assert_eq!(err.stderr(), "boom\n");
    }
}
