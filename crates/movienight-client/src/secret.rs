//! Secret reference resolver.
//!
//! Attendee entries in `config.toml` can point at values stored outside the
//! file:
//!
//! - `pass::path/in/store`: runs `pass show path/in/store`, returns first line
//! - `env::VAR_NAME`: reads `$VAR_NAME` from the environment
//! - anything else is returned as-is

/// Resolves a value that may contain a secret reference prefix.
pub fn resolve(value: &str) -> Result<String, String> {
    if let Some(path) = value.strip_prefix("pass::") {
        resolve_pass(path)
    } else if let Some(var) = value.strip_prefix("env::") {
        resolve_env(var)
    } else {
        Ok(value.to_string())
    }
}

/// Like [`resolve`], but an unset or empty environment variable yields
/// `None` instead of an error.
pub fn resolve_optional(value: &str) -> Result<Option<String>, String> {
    if let Some(var) = value.strip_prefix("env::") {
        return Ok(std::env::var(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty()));
    }
    let resolved = resolve(value)?;
    let resolved = resolved.trim();
    Ok((!resolved.is_empty()).then(|| resolved.to_string()))
}

/// Runs `pass show <path>` and returns the first line of stdout.
fn resolve_pass(path: &str) -> Result<String, String> {
    let output = std::process::Command::new("pass")
        .arg("show")
        .arg(path)
        .output()
        .map_err(|e| format!("failed to run `pass show {}`: {}", path, e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!(
            "`pass show {}` failed ({}): {}",
            path,
            output.status,
            stderr.trim()
        ));
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(str::to_string)
        .ok_or_else(|| format!("`pass show {}` produced no output", path))
}

fn resolve_env(var: &str) -> Result<String, String> {
    std::env::var(var).map_err(|_| format!("environment variable `{}` is not set", var))
}
