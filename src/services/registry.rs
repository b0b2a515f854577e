//! Registry service
//!
//! Get-or-create over the link store: canonical URLs map to exactly one
//! active code, and new codes are unique even under concurrent writers.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::LinksConfig;
use crate::errors::{Result, SharelinkError};
use crate::storage::{LinkRecord, LinkStore};
use crate::utils::{CodeGenerator, MAX_CODE_LENGTH, UrlPolicy, canonicalize_url};

/// Code generation and retry limits.
#[derive(Debug, Clone)]
pub struct RegistrySettings {
    pub code_length: usize,
    pub max_attempts: usize,
    pub escalation_steps: usize,
    pub max_insert_retries: usize,
    pub default_created_by: String,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self::from(&LinksConfig::default())
    }
}

impl From<&LinksConfig> for RegistrySettings {
    /// 长度限制在 `1..=MAX_CODE_LENGTH`，升级后也不超过上限，否则生成的短码无法解析
    fn from(config: &LinksConfig) -> Self {
        let code_length = config.code_length.clamp(1, MAX_CODE_LENGTH);
        Self {
            code_length,
            max_attempts: config.max_attempts.max(1),
            escalation_steps: config.escalation_steps.min(MAX_CODE_LENGTH - code_length),
            max_insert_retries: config.max_insert_retries,
            default_created_by: config.default_created_by.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryOutcome {
    pub record: LinkRecord,
    /// `true` when an existing active record was returned
    pub reused: bool,
}

pub struct RegistryService {
    store: Arc<dyn LinkStore>,
    generator: CodeGenerator,
    policy: Arc<dyn UrlPolicy>,
    settings: RegistrySettings,
}

impl RegistryService {
    pub fn new(
        store: Arc<dyn LinkStore>,
        generator: CodeGenerator,
        policy: Arc<dyn UrlPolicy>,
        settings: RegistrySettings,
    ) -> Self {
        Self {
            store,
            generator,
            policy,
            settings,
        }
    }

    pub fn settings(&self) -> &RegistrySettings {
        &self.settings
    }

    /// Return the active record for `long_url`, creating one if needed.
    ///
    /// A `Conflict` from the store is never returned: it means another
    /// writer won a race, either on the generated code (generate again) or
    /// on the URL itself (return the winner's record).
    pub async fn get_or_create(&self, long_url: &str, attribution: &str) -> Result<RegistryOutcome> {
        let (canonical, parsed) = canonicalize_url(long_url)?;
        self.policy.check(&parsed)?;

        if let Some(existing) = self.find_active(&canonical).await? {
            debug!("Reusing '{}' for {}", existing.code, canonical);
            return Ok(RegistryOutcome {
                record: existing,
                reused: true,
            });
        }

        let created_by = match attribution.trim() {
            "" => self.settings.default_created_by.as_str(),
            tag => tag,
        };

        let mut conflicts = 0;
        loop {
            let code = self.generate_unique_code().await?;
            let record = LinkRecord::new(code, canonical.clone(), created_by);

            match self.store.insert(record.clone()).await {
                Ok(()) => {
                    info!(
                        "Registry: created '{}' -> '{}' (by {})",
                        record.code, record.long_url, record.created_by
                    );
                    return Ok(RegistryOutcome {
                        record,
                        reused: false,
                    });
                }
                Err(SharelinkError::Conflict(reason)) => {
                    debug!("Insert of '{}' lost a race: {}", record.code, reason);

                    if let Some(existing) = self.find_active(&canonical).await? {
                        return Ok(RegistryOutcome {
                            record: existing,
                            reused: true,
                        });
                    }

                    conflicts += 1;
                    if conflicts > self.settings.max_insert_retries {
                        warn!(
                            "Giving up on {} after {} insert conflicts",
                            canonical, conflicts
                        );
                        return Err(SharelinkError::code_space_exhausted(format!(
                            "Short code kept colliding on insert ({} conflicts), try again",
                            conflicts
                        )));
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn find_active(&self, canonical: &str) -> Result<Option<LinkRecord>> {
        Ok(self
            .store
            .find_by_url(canonical)
            .await?
            .filter(LinkRecord::is_active))
    }

    /// Draw candidates at the base length, then at each escalated length,
    /// `max_attempts` times per length.
    async fn generate_unique_code(&self) -> Result<String> {
        let base = self.settings.code_length.clamp(1, MAX_CODE_LENGTH);
        let last = base
            .saturating_add(self.settings.escalation_steps)
            .min(MAX_CODE_LENGTH);

        for length in base..=last {
            for _ in 0..self.settings.max_attempts {
                let code = self.generator.generate(length);
                if !self.store.code_exists(&code).await? {
                    return Ok(code);
                }
            }

            if length < last {
                warn!(
                    "No free {}-symbol code after {} attempts, escalating to {}",
                    length,
                    self.settings.max_attempts,
                    length + 1
                );
            }
        }

        Err(SharelinkError::code_space_exhausted(format!(
            "Unable to generate a unique code after {} attempts per length ({}..={} symbols)",
            self.settings.max_attempts, base, last
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_from_config_clamps_zero() {
        let config = LinksConfig {
            code_length: 0,
            max_attempts: 0,
            ..LinksConfig::default()
        };
        let settings = RegistrySettings::from(&config);
        assert_eq!(settings.code_length, 1);
        assert_eq!(settings.max_attempts, 1);
        assert_eq!(settings.escalation_steps, 1);
    }

    #[test]
    fn test_settings_from_config_caps_length() {
        let config = LinksConfig {
            code_length: 40,
            escalation_steps: usize::MAX,
            ..LinksConfig::default()
        };
        let settings = RegistrySettings::from(&config);
        assert_eq!(settings.code_length, MAX_CODE_LENGTH);
        assert_eq!(settings.escalation_steps, 0);

        let config = LinksConfig {
            code_length: 30,
            escalation_steps: usize::MAX,
            ..LinksConfig::default()
        };
        let settings = RegistrySettings::from(&config);
        assert_eq!(settings.code_length + settings.escalation_steps, MAX_CODE_LENGTH);
    }
}
