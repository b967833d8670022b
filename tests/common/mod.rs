#![allow(dead_code)]

pub mod fake_driver;

use std::rc::Rc;

use pagebind::driver::session::Session;
use pagebind::metadata::registry::PageRegistry;

use fake_driver::FakeDriver;

/// Session bound to a fake driver and a shared registry.
pub fn new_session(driver: &FakeDriver, registry: &PageRegistry) -> Session {
    Session::new(Rc::new(driver.clone()), registry.clone())
}
