use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

use crate::driver::driver_model::{AppRequest, ElementHandle, WebDriver};
use crate::error::PageError;
use crate::metadata::registry::PageRegistry;
use crate::page::page_model::PageObject;
use crate::trace::logger::TraceLogger;
use crate::trace::trace::TraceEvent;

/// Tunables of one browser session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Patience for `wait_for_document`, in seconds.
    pub document_timeout_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            document_timeout_secs: 60,
        }
    }
}

/// The shared handle every node of the page-object tree holds: the driver
/// transport, the page-type registry used to resolve destination names, a
/// trace logger and the session configuration.
///
/// Cloning is cheap; all clones refer to the same underlying session. One
/// logical actor (a test) drives one session at a time.
#[derive(Clone)]
pub struct Session {
    driver: Rc<dyn WebDriver>,
    registry: PageRegistry,
    tracer: Rc<TraceLogger>,
    config: SessionConfig,
}

impl Session {
    pub fn new(driver: Rc<dyn WebDriver>, registry: PageRegistry) -> Self {
        Session {
            driver,
            registry,
            tracer: Rc::new(TraceLogger::disabled()),
            config: SessionConfig::default(),
        }
    }

    pub fn with_tracer(mut self, tracer: TraceLogger) -> Self {
        self.tracer = Rc::new(tracer);
        self
    }

    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn registry(&self) -> &PageRegistry {
        &self.registry
    }

    /// Construct a page object for a registered type name.
    pub fn page(&self, name: &str) -> Result<PageObject, PageError> {
        let ty = self.registry.resolve(name)?;
        Ok(PageObject::new(self.clone(), ty))
    }

    /// Document-scoped element lookup.
    pub fn find_element(
        &self,
        strategy: &str,
        selector: &str,
    ) -> Result<ElementHandle, PageError> {
        self.driver.find_element(strategy, selector)
    }

    /// Document-scoped lookup of all matching elements.
    pub fn find_elements(
        &self,
        strategy: &str,
        selector: &str,
    ) -> Result<Vec<ElementHandle>, PageError> {
        self.driver.find_elements(strategy, selector)
    }

    pub fn current_url(&self) -> Result<String, PageError> {
        self.driver.current_url()
    }

    /// Route the browser's current URL back into a logical request.
    pub fn app_request(&self) -> Result<AppRequest, PageError> {
        let url = self.driver.current_url()?;
        self.driver.route_url(&url)
    }

    pub fn navigate_to(&self, url: &str) -> Result<(), PageError> {
        self.trace(&TraceEvent::Navigate {
            target: url.to_string(),
        });
        self.driver.navigate_to(url)
    }

    pub fn navigate_to_route(
        &self,
        route_name: &str,
        parameters: &BTreeMap<String, String>,
    ) -> Result<(), PageError> {
        self.trace(&TraceEvent::Navigate {
            target: format!("route:{}", route_name),
        });
        self.driver.navigate_to_route(route_name, parameters)
    }

    /// Wait for the document to settle, using the configured timeout.
    pub fn wait_for_document(&self) -> Result<(), PageError> {
        self.driver
            .wait_for_document_ready(Duration::from_secs(self.config.document_timeout_secs))
    }

    pub fn trace(&self, event: &TraceEvent) {
        self.tracer.log(event);
    }
}
