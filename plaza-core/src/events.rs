//! Service events.
//!
//! Successful create/update/patch/remove calls emit a standard event
//! after the after-hooks complete. Listeners are registered with exact
//! or wildcard patterns; the event hub is held behind an RwLock in the
//! app, so emission snapshots matching listeners under the read lock
//! and awaits them with no lock held.

use std::sync::Arc;

use crate::hooks::{HookContext, HookFut, HookResult};
use crate::service::ServiceMethodKind;

/// Standard event names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ServiceEventKind {
    Created,
    Updated,
    Patched,
    Removed,
}

/// Listener signature (async). Receives the service path, the event,
/// the call result, and the hook context of the finished call.
pub type EventListener<R, P> = Arc<
    dyn for<'a> Fn(
            &'a str,
            &'a ServiceEventKind,
            &'a HookResult<R>,
            &'a HookContext<R, P>,
        ) -> HookFut<'a>
        + Send
        + Sync,
>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ServiceNamePat {
    Any,
    Exact(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventPat {
    Any,
    Exact(ServiceEventKind),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceEventPattern {
    pub service: ServiceNamePat,
    pub event: EventPat,
}

impl ServiceEventPattern {
    pub fn exact(service: impl Into<String>, event: ServiceEventKind) -> Self {
        Self {
            service: ServiceNamePat::Exact(service.into()),
            event: EventPat::Exact(event),
        }
    }

    /// Every standard event on every service.
    pub fn any() -> Self {
        Self {
            service: ServiceNamePat::Any,
            event: EventPat::Any,
        }
    }

    /// Every standard event on one service.
    pub fn service(service: impl Into<String>) -> Self {
        Self {
            service: ServiceNamePat::Exact(service.into()),
            event: EventPat::Any,
        }
    }

    pub fn matches(&self, path: &str, event: &ServiceEventKind) -> bool {
        let service_ok = match &self.service {
            ServiceNamePat::Any => true,
            ServiceNamePat::Exact(s) => s == path,
        };
        let event_ok = match &self.event {
            EventPat::Any => true,
            EventPat::Exact(e) => e == event,
        };
        service_ok && event_ok
    }
}

struct ListenerEntry<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    pattern: ServiceEventPattern,
    listener: EventListener<R, P>,
}

pub struct EventHub<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    listeners: Vec<ListenerEntry<R, P>>,
}

impl<R, P> Default for EventHub<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<R, P> EventHub<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn on_exact(
        &mut self,
        path: impl Into<String>,
        event: ServiceEventKind,
        listener: EventListener<R, P>,
    ) {
        self.on_pattern(ServiceEventPattern::exact(path, event), listener);
    }

    pub fn on_pattern(&mut self, pattern: ServiceEventPattern, listener: EventListener<R, P>) {
        self.listeners.push(ListenerEntry { pattern, listener });
    }

    /// Snapshot the listeners matching an emission. No `.await` here,
    /// so it is safe under a read lock.
    pub fn matching(&self, path: &str, event: &ServiceEventKind) -> Vec<EventListener<R, P>> {
        self.listeners
            .iter()
            .filter(|e| e.pattern.matches(path, event))
            .map(|e| e.listener.clone())
            .collect()
    }
}

/// Only these methods emit standard events.
pub fn method_to_standard_event(method: &ServiceMethodKind) -> Option<ServiceEventKind> {
    match method {
        ServiceMethodKind::Create => Some(ServiceEventKind::Created),
        ServiceMethodKind::Update => Some(ServiceEventKind::Updated),
        ServiceMethodKind::Patch => Some(ServiceEventKind::Patched),
        ServiceMethodKind::Remove => Some(ServiceEventKind::Removed),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_matching() {
        let exact = ServiceEventPattern::exact("pages", ServiceEventKind::Created);
        assert!(exact.matches("pages", &ServiceEventKind::Created));
        assert!(!exact.matches("pages", &ServiceEventKind::Removed));
        assert!(!exact.matches("media", &ServiceEventKind::Created));

        let per_service = ServiceEventPattern::service("pages");
        assert!(per_service.matches("pages", &ServiceEventKind::Patched));
        assert!(!per_service.matches("tenants", &ServiceEventKind::Patched));

        let any = ServiceEventPattern::any();
        assert!(any.matches("anything", &ServiceEventKind::Updated));
    }

    #[test]
    fn only_write_methods_emit() {
        assert_eq!(
            method_to_standard_event(&ServiceMethodKind::Create),
            Some(ServiceEventKind::Created)
        );
        assert_eq!(method_to_standard_event(&ServiceMethodKind::Find), None);
        assert_eq!(method_to_standard_event(&ServiceMethodKind::Get), None);
    }
}
