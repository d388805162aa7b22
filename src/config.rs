use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::client::{ClientConfig, DEFAULT_URL};

#[derive(Debug, Default)]
struct RcConfig {
    url: Option<String>,
    key: Option<String>,
    verify: Option<bool>,
    timeout: Option<Duration>,
}

pub(crate) fn load_config(
    url: Option<String>,
    key: Option<String>,
    verify: Option<bool>,
) -> Result<ClientConfig> {
    let url = url.or_else(|| std::env::var("AEMET_URL").ok());
    let key = key.or_else(|| std::env::var("AEMET_API_KEY").ok());

    let rc_candidates = rc_candidates();
    let mut rc = RcConfig::default();
    for rc_path in &rc_candidates {
        if rc_path.exists() {
            rc = read_rc(rc_path).with_context(|| {
                format!("failed to read configuration file {}", rc_path.display())
            })?;
            break;
        }
    }

    resolve(url, key, verify, rc, &rc_candidates)
}

fn resolve(
    url: Option<String>,
    key: Option<String>,
    verify: Option<bool>,
    rc: RcConfig,
    rc_candidates: &[PathBuf],
) -> Result<ClientConfig> {
    let api_key = match key.filter(|k| !k.trim().is_empty()).or(rc.key) {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => {
            if !rc_candidates.is_empty() {
                bail!(
                    "Missing configuration: key (set AEMET_API_KEY or put `key:` in one of: {})",
                    rc_candidates
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            }
            bail!("Missing configuration: key (set AEMET_API_KEY or create .aemetrc)");
        }
    };

    let mut cfg = ClientConfig::new(api_key);
    cfg.url = url.or(rc.url).unwrap_or_else(|| DEFAULT_URL.to_string());
    cfg.verify = verify.or(rc.verify).unwrap_or(true);
    if let Some(timeout) = rc.timeout {
        cfg.timeout = timeout;
    }
    Ok(cfg)
}

fn read_rc(path: &Path) -> Result<RcConfig> {
    let text = std::fs::read_to_string(path)?;
    parse_rc(&text)
}

fn parse_rc(text: &str) -> Result<RcConfig> {
    let mut cfg = RcConfig::default();

    // `key:` alone on a line takes its value from the following line.
    let mut pending_key: Option<&str> = None;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(pk) = pending_key.take() {
            if !line.contains(':') {
                let v = strip_quotes(line);
                match pk {
                    "url" => cfg.url = Some(v.to_string()),
                    "key" => cfg.key = Some(v.to_string()),
                    _ => {}
                }
                continue;
            }
        }

        if let Some((k, v)) = line.split_once(':') {
            let k = k.trim();
            let v = strip_quotes(v.trim());
            match k {
                "url" | "key" if v.is_empty() => pending_key = Some(k),
                "url" => cfg.url = Some(v.to_string()),
                "key" => cfg.key = Some(v.to_string()),
                "verify" => {
                    if !v.is_empty() {
                        cfg.verify = Some(v != "0");
                    }
                }
                "timeout" => {
                    if !v.is_empty() {
                        let secs: f64 = v
                            .parse()
                            .with_context(|| format!("invalid timeout value `{}`", v))?;
                        cfg.timeout = Some(
                            Duration::try_from_secs_f64(secs)
                                .with_context(|| format!("invalid timeout value `{}`", v))?,
                        );
                    }
                }
                _ => {}
            }
        }
    }

    Ok(cfg)
}

fn strip_quotes(s: &str) -> &str {
    let s = s.trim();
    if (s.starts_with('"') && s.ends_with('"') && s.len() >= 2)
        || (s.starts_with('\'') && s.ends_with('\'') && s.len() >= 2)
    {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

fn rc_candidates() -> Vec<PathBuf> {
    // AEMET_RC wins outright; otherwise ./.aemetrc then ~/.aemetrc
    if let Ok(p) = std::env::var("AEMET_RC") {
        return vec![PathBuf::from(p)];
    }

    let mut v = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        v.push(cwd.join(".aemetrc"));
    }
    if let Some(home) = dirs::home_dir() {
        v.push(home.join(".aemetrc"));
    }
    v
}
