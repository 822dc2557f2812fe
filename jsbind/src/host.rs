///
/// Host Runtime Gate
///
/// Generated modules run on a host JS runtime and are packaged with its
/// package manager. Before code generation both tools must be present and
/// satisfy the configured semver requirements.
///

use std::process::Command;

use semver::{Version, VersionReq};
use tracing::{debug, info};

use crate::config::BackendConfig;
use crate::error::BackendError;

pub trait HostTool {
    fn name(&self) -> &str;

    /// Raw version text, e.g. `v20.11.1`.
    fn version(&self) -> Result<String, BackendError>;
}

/// A tool on `PATH` that prints its version for `--version`.
pub struct CommandTool {
    program: String,
}

impl CommandTool {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }
}

impl HostTool for CommandTool {
    fn name(&self) -> &str {
        &self.program
    }

    fn version(&self) -> Result<String, BackendError> {
        let output = Command::new(&self.program).arg("--version").output().map_err(|e| {
            BackendError::HostTool { tool: self.program.clone(), reason: format!("failed to run: {}", e) }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BackendError::HostTool {
                tool: self.program.clone(),
                reason: format!("--version exited with {}: {}", output.status, stderr.trim()),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Parses `v20.11.1`, `10.2.4` and the like. Only the first line counts.
pub fn parse_version(text: &str) -> Result<Version, BackendError> {
    let line = text.lines().next().unwrap_or("").trim();
    let line = line.strip_prefix('v').unwrap_or(line);
    Ok(Version::parse(line)?)
}

pub fn require_compatible(tool: &dyn HostTool, required: &VersionReq) -> Result<Version, BackendError> {
    let found = parse_version(&tool.version()?)?;
    debug!(tool = tool.name(), %found, %required, "checking host tool");
    if !required.matches(&found) {
        return Err(BackendError::IncompatibleHost {
            tool: tool.name().to_string(),
            found,
            required: required.clone(),
        });
    }
    Ok(found)
}

/// Checks `node` and `npm` against the configured requirements.
pub fn check_host(config: &BackendConfig) -> Result<Vec<(String, Version)>, BackendError> {
    let node = CommandTool::new("node");
    let npm = CommandTool::new("npm");
    check_tools(&[(&node as &dyn HostTool, &config.host.node), (&npm as &dyn HostTool, &config.host.npm)])
}

fn check_tools(tools: &[(&dyn HostTool, &String)]) -> Result<Vec<(String, Version)>, BackendError> {
    let mut found = Vec::with_capacity(tools.len());
    for (tool, requirement) in tools {
        let required = VersionReq::parse(requirement)?;
        let version = require_compatible(*tool, &required)?;
        info!(tool = tool.name(), %version, "host tool ok");
        found.push((tool.name().to_string(), version));
    }
    Ok(found)
}
