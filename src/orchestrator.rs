//! Sequential, rate-limited fan-out of one edit request into several prompt
//! variants.
//!
//! Calls are issued strictly one at a time with a cooldown in between; the
//! external service rejects bursts. Individual failures are recorded and the
//! round carries on. The round only fails when nothing succeeded.

use crate::{
    config::OrchestratorConfig,
    error::{Result, StudioError},
    logger,
    models::{EditRequest, GenerationOutcome, ProgressSignal, ProgressSink, VariantFailure},
    prompt::{instruction_block, variant_prompt},
    traits::{ImageGenerator, Pacer, TokioPacer},
};
use tokio_util::sync::CancellationToken;

pub struct Orchestrator<G, P = TokioPacer> {
    generator: G,
    pacer: P,
    config: OrchestratorConfig,
}

impl<G: ImageGenerator> Orchestrator<G, TokioPacer> {
    pub fn new(generator: G, config: OrchestratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            generator,
            pacer: TokioPacer,
            config,
        })
    }
}

impl<G: ImageGenerator, P: Pacer> Orchestrator<G, P> {
    pub fn with_pacer<Q: Pacer>(self, pacer: Q) -> Orchestrator<G, Q> {
        Orchestrator {
            generator: self.generator,
            pacer,
            config: self.config,
        }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Runs a round with no progress reporting and no way to cancel it.
    pub async fn generate(&self, request: &EditRequest) -> Result<GenerationOutcome> {
        self.run(request, None, &CancellationToken::new()).await
    }

    /// Runs one round.
    ///
    /// The token is checked before each variant call and before each
    /// cooldown, and a cooldown in progress ends as soon as it fires. A call
    /// already in flight is allowed to finish. Images collected before the
    /// cancellation are kept.
    pub async fn run(
        &self,
        request: &EditRequest,
        progress: Option<&dyn ProgressSink>,
        cancel: &CancellationToken,
    ) -> Result<GenerationOutcome> {
        request.validate()?;

        let total = self.config.variant_count;
        let block = instruction_block(&request.base_prompt, request.style, request.quality);
        let _timer = logger::timer("generation round");

        log::info!(
            "Starting round: {} variants, style {}, quality {}, cooldown {:?}",
            total,
            request.style,
            request.quality,
            self.config.cooldown
        );

        let mut outcome = GenerationOutcome::default();
        let mut first_error: Option<StudioError> = None;

        for index in 1..=total {
            if cancel.is_cancelled() {
                outcome.cancelled = true;
                break;
            }

            let prompt = variant_prompt(&block, index).ok_or_else(|| {
                StudioError::ConfigError(format!("no creative directive for variant {}", index))
            })?;

            if let Some(sink) = progress {
                sink.on_progress(ProgressSignal {
                    current: index,
                    total,
                });
            }

            let call = self
                .generator
                .generate(&request.credential, &request.image, &prompt, index);
            let result = match tokio::time::timeout(self.config.call_timeout, call).await {
                Ok(result) => result,
                Err(_) => Err(StudioError::Timeout(self.config.call_timeout)),
            };

            match result {
                Ok(image) => {
                    log::info!("Variant {}/{} generated ({})", index, total, image.id);
                    outcome.images.push(image);
                }
                Err(e) => {
                    log::warn!("Variant {}/{} failed: {}", index, total, e);
                    outcome.failures.push(VariantFailure {
                        variant: index,
                        reason: e.to_string(),
                    });
                    first_error.get_or_insert(e);
                }
            }

            if index == total {
                break;
            }
            if cancel.is_cancelled() {
                outcome.cancelled = true;
                break;
            }

            log::debug!("Cooling down for {:?} before variant {}", self.config.cooldown, index + 1);
            tokio::select! {
                _ = cancel.cancelled() => {
                    outcome.cancelled = true;
                    break;
                }
                _ = self.pacer.pause(self.config.cooldown) => {}
            }
        }

        if outcome.cancelled {
            log::warn!(
                "Round cancelled after {} of {} variants",
                outcome.attempted(),
                total
            );
        }

        if outcome.images.is_empty() {
            return Err(match first_error {
                Some(cause) if !outcome.cancelled => StudioError::RoundExhausted {
                    first_cause: Box::new(cause),
                },
                _ => StudioError::Cancelled,
            });
        }

        log::info!(
            "Round finished: {} succeeded, {} failed",
            outcome.images.len(),
            outcome.failures.len()
        );
        Ok(outcome)
    }
}
