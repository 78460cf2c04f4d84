use super::App;

use crate::config::Config;
use crate::instrument::{Connect, Simulated};
use crate::persist::{Persist, TextDump};
use crate::poller::{LogNotice, Notice, Prompt};
use crate::result::Result;
use crate::stimulus::{LogRender, Render, Stimuli, WhiteNoise};

use derivative::Derivative;
use log::error;

use std::sync::atomic::{AtomicBool, Ordering::SeqCst};
use std::sync::Arc;

/// Collects collaborators for an `App`, anything not set explicitly is
/// derived from the config on `build`.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct Builder {
    config: Config,
    #[derivative(Debug = "ignore")]
    connector: Option<Box<dyn Connect>>,
    #[derivative(Debug = "ignore")]
    notice: Option<Box<dyn Notice>>,
    #[derivative(Debug = "ignore")]
    stimuli: Option<Box<dyn Stimuli>>,
    #[derivative(Debug = "ignore")]
    renderer: Option<Box<dyn Render>>,
    #[derivative(Debug = "ignore")]
    sink: Option<Box<dyn Persist>>,
    termination_flag: Arc<AtomicBool>,
}

impl Default for Builder {
    fn default() -> Self {
        Builder {
            config: Config::default(),
            connector: None,
            notice: None,
            stimuli: None,
            renderer: None,
            sink: None,
            // if never set up, termination flag never changes to true
            termination_flag: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl Builder {
    pub fn new() -> Builder {
        Default::default()
    }

    pub fn config(&mut self, config: Config) -> &mut Self {
        self.config = config;
        self
    }

    /// Uses the given instrument instead of the simulation.
    pub fn connector(&mut self, connector: impl Connect + 'static) -> &mut Self {
        self.connector = Some(Box::new(connector));
        self
    }

    pub fn notice(&mut self, notice: impl Notice + 'static) -> &mut Self {
        self.notice = Some(Box::new(notice));
        self
    }

    pub fn stimuli(&mut self, stimuli: impl Stimuli + 'static) -> &mut Self {
        self.stimuli = Some(Box::new(stimuli));
        self
    }

    pub fn renderer(&mut self, renderer: impl Render + 'static) -> &mut Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn persist(&mut self, sink: impl Persist + 'static) -> &mut Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Sets a custom termination flag, setting it closes the stimulus
    /// and ends the run.
    pub fn termination_flag(&mut self, flag: &Arc<AtomicBool>) -> &mut Self {
        self.termination_flag = Arc::clone(flag);
        self
    }

    pub fn terminate_on_ctrlc_and_sigterm(&mut self) -> &mut Self {
        let termination_requested = Arc::new(AtomicBool::new(false));

        let handler_reference = Arc::clone(&termination_requested);
        let result = ctrlc::set_handler(move || {
            handler_reference.store(true, SeqCst);
        });

        match result {
            Ok(()) => self.termination_flag(&termination_requested),
            Err(e) => {
                error!(
                    "Failed to set up signal handler for safe termination. \
                     The polarimeter may not be released on exit. \
                     Error: {:?}",
                    e
                );
                self
            }
        }
    }

    /// Consumes the builder and creates an app from it.
    ///
    /// Fails if the config holds unusable values, e.g. an unsupported
    /// frame rate.
    pub fn build(self) -> Result<App> {
        let Builder {
            config,
            connector,
            notice,
            stimuli,
            renderer,
            sink,
            termination_flag,
        } = self;
        config.validate()?;

        let connector: Box<dyn Connect> = match connector {
            Some(connector) => connector,
            None => Box::new(simulation(&config)?),
        };
        let notice: Box<dyn Notice> = match notice {
            Some(notice) => notice,
            None if config.prompt => Box::new(Prompt::stdio()),
            None => Box::new(LogNotice),
        };
        let stimuli: Box<dyn Stimuli> = match (stimuli, config.seed) {
            (Some(stimuli), _) => stimuli,
            (None, Some(seed)) => Box::new(WhiteNoise::seeded(seed)),
            (None, None) => Box::new(WhiteNoise::new()),
        };
        let renderer: Box<dyn Render> = match renderer {
            Some(renderer) => renderer,
            None => Box::new(LogRender),
        };
        let sink: Box<dyn Persist> = match sink {
            Some(sink) => sink,
            None => Box::new(TextDump::new(config.output.clone())),
        };

        Ok(App {
            connector,
            notice,
            stimuli,
            renderer,
            sink,
            period: config.period()?,
            sample_limit: config.samples,
            startup_timeout: config.startup_timeout()?,
            shutdown_timeout: config.shutdown_timeout()?,
            termination_flag,
        })
    }
}

fn simulation(config: &Config) -> Result<Simulated> {
    let simulated = Simulated::new(config.read_latency()?)
        .failing_first(config.simulation.connect_failures);

    Ok(match config.seed {
        Some(seed) => simulated.seeded(seed),
        None => simulated,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use std::time::Duration;

    #[test]
    fn build_with_default_settings() {
        // given
        let builder = App::builder();

        // when
        let app = builder.build().unwrap();

        // then
        assert_eq!(app.period, Duration::from_millis(100));
        assert_eq!(app.sample_limit, None);
        assert_eq!(app.startup_timeout, None);
        assert_eq!(app.shutdown_timeout, Duration::from_secs(2));
        assert_eq!(app.termination_flag.load(SeqCst), false);
    }

    #[test]
    fn invalid_frame_rate_fails_build() {
        let mut config = Config::default();
        config.fps = 100.0;
        let mut builder = App::builder();
        builder.config(config);

        assert!(builder.build().is_err());
    }
}
