use crate::model::PathguardConfigV1;
use pathguard_domain::resolver::AliasTables;
use pathguard_domain::ScanConfig;

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub workers: Option<usize>,
    pub chunk_size: Option<usize>,
    pub check_allowlist: Option<bool>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub scan: ScanConfig,
    pub aliases: AliasTables,
}

/// Resolve the effective scan config and alias tables
/// (overrides > file config > defaults).
pub fn resolve_config(
    cfg: PathguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let mut scan = ScanConfig::default();

    if let Some(workers) = overrides.workers.or(cfg.workers) {
        anyhow::ensure!(workers > 0, "workers must be at least 1");
        scan.workers = workers;
    }
    if let Some(chunk_size) = overrides.chunk_size.or(cfg.chunk_size) {
        anyhow::ensure!(chunk_size > 0, "chunk_size must be at least 1");
        scan.chunk_size = chunk_size;
    }
    if let Some(enabled) = overrides.check_allowlist.or(cfg.allowlist.enabled) {
        scan.check_allowlist = enabled;
    }

    let mut aliases = AliasTables::default();
    for (token, substitution) in cfg.resolver.tokens {
        anyhow::ensure!(
            token.len() >= 2 && token.starts_with('%') && token.ends_with('%'),
            "resolver token {token:?} must be wrapped in percent signs"
        );
        let substitution = (!substitution.is_empty()).then_some(substitution);
        aliases.tokens.insert(token, substitution);
    }
    for (from, to) in cfg.resolver.swaps {
        anyhow::ensure!(
            !to.is_empty(),
            "resolver swap for {from:?} must name a replacement"
        );
        aliases.directory_swaps.insert(from, to);
    }

    Ok(ResolvedConfig { scan, aliases })
}
