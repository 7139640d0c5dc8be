use surplus_core::{Effect, Msg, ShutdownReason};
use surplus_engine::{dispatch_notification, Notifier, SchedulerHandle};
use surplus_logging::{watch_error, watch_info};

use super::persistence::{AppConfig, ConfigStore};

/// Carries out the effects produced by `update` against the scheduler,
/// the notifier and the config file.
pub struct EffectRunner {
    scheduler: SchedulerHandle,
    notifier: Box<dyn Notifier>,
    store: ConfigStore,
    config: AppConfig,
    shutdown: Option<ShutdownReason>,
}

impl EffectRunner {
    pub fn new(
        scheduler: SchedulerHandle,
        notifier: Box<dyn Notifier>,
        store: ConfigStore,
        config: AppConfig,
    ) -> Self {
        Self {
            scheduler,
            notifier,
            store,
            config,
            shutdown: None,
        }
    }

    /// Runs `effects` in order. Returns the messages they produce.
    pub fn run(&mut self, effects: Vec<Effect>) -> Vec<Msg> {
        let mut replies = Vec::new();
        for effect in effects {
            match effect {
                Effect::Notify(offer) => dispatch_notification(self.notifier.as_ref(), &offer),
                Effect::ApplySearch { location, criteria } => {
                    self.scheduler.update_search(location, criteria);
                }
                Effect::SetRefreshInterval(interval) => {
                    if let Err(err) = self.scheduler.set_refresh_interval(interval) {
                        watch_error!("Refresh interval rejected: {}", err);
                    }
                }
                Effect::RunNow => self.scheduler.run_now(),
                Effect::SaveConfig(settings) => {
                    let mut config = self.config.clone();
                    config.apply_settings(&settings);
                    match self.store.save(&config) {
                        Ok(()) => {
                            self.config = config;
                            replies.push(Msg::ConfigSaved);
                        }
                        Err(err) => {
                            watch_error!("Saving config failed: {:#}", err);
                            replies.push(Msg::ConfigSaveFailed(format!("{err:#}")));
                        }
                    }
                }
                Effect::Shutdown { reason } => {
                    watch_info!("Shutdown requested: {:?}", reason);
                    self.scheduler.stop();
                    self.shutdown.get_or_insert(reason);
                }
            }
        }
        replies
    }

    pub fn shutdown_reason(&self) -> Option<ShutdownReason> {
        self.shutdown
    }
}
