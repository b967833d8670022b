use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::{Rc, Weak};
use std::time::Duration;

use serde_json::Value;

use pagebind::driver::driver_model::{AppRequest, Element, ElementHandle, WebDriver};
use pagebind::error::PageError;

/// Scriptable in-memory stand-in for the WebDriver collaborator: a current
/// URL, a routing table, and elements placed per (url, strategy, selector).
/// Counts lookups and document waits so tests can assert memoization and
/// dispatch behavior.
#[derive(Default)]
pub struct FakeState {
    pub url: String,
    pub routes: HashMap<String, AppRequest>,
    pub entries: Vec<Entry>,
    pub find_count: usize,
    pub wait_count: usize,
    pub navigated_urls: Vec<String>,
    pub navigated_routes: Vec<(String, BTreeMap<String, String>)>,
}

pub struct Entry {
    pub url: String,
    pub strategy: String,
    pub selector: String,
    pub element: Rc<FakeElement>,
}

#[derive(Clone)]
pub struct FakeDriver {
    state: Rc<RefCell<FakeState>>,
}

impl FakeDriver {
    pub fn new(url: &str) -> Self {
        let state = FakeState {
            url: url.to_string(),
            ..FakeState::default()
        };
        FakeDriver {
            state: Rc::new(RefCell::new(state)),
        }
    }

    pub fn make_element(&self, tag: &str) -> Rc<FakeElement> {
        Rc::new(FakeElement {
            tag: tag.to_string(),
            attributes: RefCell::new(HashMap::new()),
            calls: RefCell::new(Vec::new()),
            effects: RefCell::new(HashMap::new()),
            children: RefCell::new(Vec::new()),
            state: Rc::downgrade(&self.state),
        })
    }

    /// Make an element findable on a page.
    pub fn place(&self, url: &str, strategy: &str, selector: &str, element: &Rc<FakeElement>) {
        self.state.borrow_mut().entries.push(Entry {
            url: url.to_string(),
            strategy: strategy.to_string(),
            selector: selector.to_string(),
            element: element.clone(),
        });
    }

    /// Teach the reverse router about a URL.
    pub fn add_route(&self, url: &str, route_name: &str, parameters: &[(&str, &str)]) {
        self.state.borrow_mut().routes.insert(
            url.to_string(),
            AppRequest {
                route_name: route_name.to_string(),
                parameters: parameters
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            },
        );
    }

    pub fn set_url(&self, url: &str) {
        self.state.borrow_mut().url = url.to_string();
    }

    pub fn find_count(&self) -> usize {
        self.state.borrow().find_count
    }

    pub fn wait_count(&self) -> usize {
        self.state.borrow().wait_count
    }

    pub fn navigated_urls(&self) -> Vec<String> {
        self.state.borrow().navigated_urls.clone()
    }

    pub fn navigated_routes(&self) -> Vec<(String, BTreeMap<String, String>)> {
        self.state.borrow().navigated_routes.clone()
    }
}

impl WebDriver for FakeDriver {
    fn find_element(&self, strategy: &str, selector: &str) -> Result<ElementHandle, PageError> {
        let mut state = self.state.borrow_mut();
        state.find_count += 1;
        let url = state.url.clone();
        let found = state
            .entries
            .iter()
            .find(|e| e.url == url && e.strategy == strategy && e.selector == selector)
            .map(|e| e.element.clone());
        match found {
            Some(element) => Ok(element as ElementHandle),
            None => Err(PageError::ElementNotFound {
                strategy: strategy.to_string(),
                selector: selector.to_string(),
            }),
        }
    }

    fn find_elements(
        &self,
        strategy: &str,
        selector: &str,
    ) -> Result<Vec<ElementHandle>, PageError> {
        let mut state = self.state.borrow_mut();
        state.find_count += 1;
        let url = state.url.clone();
        Ok(state
            .entries
            .iter()
            .filter(|e| e.url == url && e.strategy == strategy && e.selector == selector)
            .map(|e| e.element.clone() as ElementHandle)
            .collect())
    }

    fn current_url(&self) -> Result<String, PageError> {
        Ok(self.state.borrow().url.clone())
    }

    fn route_url(&self, url: &str) -> Result<AppRequest, PageError> {
        self.state
            .borrow()
            .routes
            .get(url)
            .cloned()
            .ok_or_else(|| PageError::Session {
                command: "route_url".to_string(),
                detail: format!("no route matches '{}'", url),
            })
    }

    fn navigate_to(&self, url: &str) -> Result<(), PageError> {
        let mut state = self.state.borrow_mut();
        state.url = url.to_string();
        state.navigated_urls.push(url.to_string());
        Ok(())
    }

    fn navigate_to_route(
        &self,
        route_name: &str,
        parameters: &BTreeMap<String, String>,
    ) -> Result<(), PageError> {
        self.state
            .borrow_mut()
            .navigated_routes
            .push((route_name.to_string(), parameters.clone()));
        Ok(())
    }

    fn wait_for_document_ready(&self, _timeout: Duration) -> Result<(), PageError> {
        self.state.borrow_mut().wait_count += 1;
        Ok(())
    }
}

/// Fake element: fixed tag/attributes, recorded operation calls, optional
/// per-operation effects (set the browser URL, as a click triggering
/// navigation would), and nested children for scoped lookups.
#[derive(Debug)]
pub struct FakeElement {
    tag: String,
    attributes: RefCell<HashMap<String, String>>,
    pub calls: RefCell<Vec<(String, Vec<Value>)>>,
    effects: RefCell<HashMap<String, String>>,
    children: RefCell<Vec<(String, String, Rc<FakeElement>)>>,
    state: Weak<RefCell<FakeState>>,
}

impl FakeElement {
    pub fn set_attribute(&self, name: &str, value: &str) {
        self.attributes
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
    }

    /// Invoking `operation` moves the browser to `url`.
    pub fn on_call_set_url(&self, operation: &str, url: &str) {
        self.effects
            .borrow_mut()
            .insert(operation.to_string(), url.to_string());
    }

    pub fn add_child(&self, strategy: &str, selector: &str, child: &Rc<FakeElement>) {
        self.children
            .borrow_mut()
            .push((strategy.to_string(), selector.to_string(), child.clone()));
    }

    pub fn call_count(&self, operation: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|(op, _)| op == operation)
            .count()
    }

    pub fn recorded_calls(&self) -> Vec<(String, Vec<Value>)> {
        self.calls.borrow().clone()
    }

    fn bump_find_count(&self) {
        if let Some(state) = self.state.upgrade() {
            state.borrow_mut().find_count += 1;
        }
    }
}

impl Element for FakeElement {
    fn tag_name(&self) -> Result<String, PageError> {
        Ok(self.tag.clone())
    }

    fn attribute(&self, name: &str) -> Result<Option<String>, PageError> {
        Ok(self.attributes.borrow().get(name).cloned())
    }

    fn call(&self, operation: &str, args: &[Value]) -> Result<Value, PageError> {
        self.calls
            .borrow_mut()
            .push((operation.to_string(), args.to_vec()));
        let effect = self.effects.borrow().get(operation).cloned();
        if let Some(url) = effect {
            if let Some(state) = self.state.upgrade() {
                state.borrow_mut().url = url;
            }
        }
        Ok(Value::Null)
    }

    fn find_element(&self, strategy: &str, selector: &str) -> Result<ElementHandle, PageError> {
        self.bump_find_count();
        let found = self
            .children
            .borrow()
            .iter()
            .find(|(s, sel, _)| s == strategy && sel == selector)
            .map(|(_, _, child)| child.clone());
        match found {
            Some(child) => Ok(child as ElementHandle),
            None => Err(PageError::ElementNotFound {
                strategy: strategy.to_string(),
                selector: selector.to_string(),
            }),
        }
    }

    fn find_elements(
        &self,
        strategy: &str,
        selector: &str,
    ) -> Result<Vec<ElementHandle>, PageError> {
        self.bump_find_count();
        Ok(self
            .children
            .borrow()
            .iter()
            .filter(|(s, sel, _)| s == strategy && sel == selector)
            .map(|(_, _, child)| child.clone() as ElementHandle)
            .collect())
    }
}
