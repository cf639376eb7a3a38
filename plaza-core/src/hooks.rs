//! Hook pipeline types.
//!
//! Every service call runs through:
//! around (outermost) → before → service call → after (reverse order) → error.
//!
//! Hooks registered globally on the app run before hooks registered on the
//! service. Around hooks wrap the whole inner chain via [`Next`].

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::app::ServiceCaller;
use crate::config::PlazaConfigSnapshot;
use crate::service::ServiceMethodKind;
use crate::tenant::TenantContext;

pub type HookFut<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// Result of a service call as seen by after hooks and event listeners.
#[derive(Debug)]
pub enum HookResult<R> {
    One(R),
    Many(Vec<R>),
}

/// Context passed through the pipeline of a single service call.
///
/// R = record type
/// P = params type (caller identity, query options, etc.)
pub struct HookContext<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    pub tenant: TenantContext,
    pub method: ServiceMethodKind,
    /// Target record id for get/update/patch/remove.
    pub id: Option<String>,
    pub params: P,
    /// Input payload (for create/update/patch).
    pub data: Option<R>,
    /// Output (for after hooks).
    pub result: Option<HookResult<R>>,
    /// Pipeline failure (for error hooks).
    pub error: Option<anyhow::Error>,
    /// Cross-service access for hooks that need to consult other services.
    pub services: ServiceCaller<R, P>,
    /// Read-only app configuration at call time.
    pub config: PlazaConfigSnapshot,
}

impl<R, P> HookContext<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    pub fn new(
        tenant: TenantContext,
        method: ServiceMethodKind,
        params: P,
        services: ServiceCaller<R, P>,
        config: PlazaConfigSnapshot,
    ) -> Self {
        Self {
            tenant,
            method,
            id: None,
            params,
            data: None,
            result: None,
            error: None,
            services,
            config,
        }
    }
}

/// Continuation handed to an around hook. Calling `run` executes the rest
/// of the pipeline (inner around hooks, before hooks, the service call,
/// after hooks). Consumed on use.
pub struct Next<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    pub(crate) call: Box<dyn for<'a> FnOnce(&'a mut HookContext<R, P>) -> HookFut<'a> + Send>,
}

impl<R, P> Next<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    pub async fn run(self, ctx: &mut HookContext<R, P>) -> Result<()> {
        (self.call)(ctx).await
    }
}

#[async_trait]
pub trait PlazaAroundHook<R, P>: Send + Sync
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    async fn run(&self, ctx: &mut HookContext<R, P>, next: Next<R, P>) -> Result<()>;
}

#[async_trait]
pub trait PlazaBeforeHook<R, P>: Send + Sync
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    async fn run(&self, ctx: &mut HookContext<R, P>) -> Result<()>;
}

#[async_trait]
pub trait PlazaAfterHook<R, P>: Send + Sync
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    async fn run(&self, ctx: &mut HookContext<R, P>) -> Result<()>;
}

/// Error hooks observe `ctx.error`; taking it out of the context swallows
/// the failure.
#[async_trait]
pub trait PlazaErrorHook<R, P>: Send + Sync
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    async fn run(&self, ctx: &mut HookContext<R, P>) -> Result<()>;
}

/// Registration table for one scope (the app, or a single service).
pub struct ServiceHooks<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    pub(crate) around_all: Vec<Arc<dyn PlazaAroundHook<R, P>>>,
    pub(crate) around_by_method: HashMap<ServiceMethodKind, Vec<Arc<dyn PlazaAroundHook<R, P>>>>,
    pub(crate) before_all: Vec<Arc<dyn PlazaBeforeHook<R, P>>>,
    pub(crate) before_by_method: HashMap<ServiceMethodKind, Vec<Arc<dyn PlazaBeforeHook<R, P>>>>,
    pub(crate) after_all: Vec<Arc<dyn PlazaAfterHook<R, P>>>,
    pub(crate) after_by_method: HashMap<ServiceMethodKind, Vec<Arc<dyn PlazaAfterHook<R, P>>>>,
    pub(crate) error_all: Vec<Arc<dyn PlazaErrorHook<R, P>>>,
    pub(crate) error_by_method: HashMap<ServiceMethodKind, Vec<Arc<dyn PlazaErrorHook<R, P>>>>,
}

impl<R, P> Default for ServiceHooks<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<R, P> ServiceHooks<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    pub fn new() -> Self {
        Self {
            around_all: Vec::new(),
            around_by_method: HashMap::new(),
            before_all: Vec::new(),
            before_by_method: HashMap::new(),
            after_all: Vec::new(),
            after_by_method: HashMap::new(),
            error_all: Vec::new(),
            error_by_method: HashMap::new(),
        }
    }

    // ---- all-method registration ----

    pub fn around_all(&mut self, hook: Arc<dyn PlazaAroundHook<R, P>>) -> &mut Self {
        self.around_all.push(hook);
        self
    }

    pub fn before_all(&mut self, hook: Arc<dyn PlazaBeforeHook<R, P>>) -> &mut Self {
        self.before_all.push(hook);
        self
    }

    pub fn after_all(&mut self, hook: Arc<dyn PlazaAfterHook<R, P>>) -> &mut Self {
        self.after_all.push(hook);
        self
    }

    pub fn error_all(&mut self, hook: Arc<dyn PlazaErrorHook<R, P>>) -> &mut Self {
        self.error_all.push(hook);
        self
    }

    // ---- per-method registration ----

    pub fn around(
        &mut self,
        method: ServiceMethodKind,
        hook: Arc<dyn PlazaAroundHook<R, P>>,
    ) -> &mut Self {
        self.around_by_method.entry(method).or_default().push(hook);
        self
    }

    pub fn before(
        &mut self,
        method: ServiceMethodKind,
        hook: Arc<dyn PlazaBeforeHook<R, P>>,
    ) -> &mut Self {
        self.before_by_method.entry(method).or_default().push(hook);
        self
    }

    pub fn after(
        &mut self,
        method: ServiceMethodKind,
        hook: Arc<dyn PlazaAfterHook<R, P>>,
    ) -> &mut Self {
        self.after_by_method.entry(method).or_default().push(hook);
        self
    }

    pub fn error(
        &mut self,
        method: ServiceMethodKind,
        hook: Arc<dyn PlazaErrorHook<R, P>>,
    ) -> &mut Self {
        self.error_by_method.entry(method).or_default().push(hook);
        self
    }

    // ---- sugar for the common methods ----

    pub fn before_find(&mut self, hook: Arc<dyn PlazaBeforeHook<R, P>>) -> &mut Self {
        self.before(ServiceMethodKind::Find, hook)
    }

    pub fn before_get(&mut self, hook: Arc<dyn PlazaBeforeHook<R, P>>) -> &mut Self {
        self.before(ServiceMethodKind::Get, hook)
    }

    pub fn before_create(&mut self, hook: Arc<dyn PlazaBeforeHook<R, P>>) -> &mut Self {
        self.before(ServiceMethodKind::Create, hook)
    }

    pub fn before_update(&mut self, hook: Arc<dyn PlazaBeforeHook<R, P>>) -> &mut Self {
        self.before(ServiceMethodKind::Update, hook)
    }

    pub fn before_patch(&mut self, hook: Arc<dyn PlazaBeforeHook<R, P>>) -> &mut Self {
        self.before(ServiceMethodKind::Patch, hook)
    }

    pub fn before_remove(&mut self, hook: Arc<dyn PlazaBeforeHook<R, P>>) -> &mut Self {
        self.before(ServiceMethodKind::Remove, hook)
    }

    pub fn after_find(&mut self, hook: Arc<dyn PlazaAfterHook<R, P>>) -> &mut Self {
        self.after(ServiceMethodKind::Find, hook)
    }

    pub fn after_get(&mut self, hook: Arc<dyn PlazaAfterHook<R, P>>) -> &mut Self {
        self.after(ServiceMethodKind::Get, hook)
    }

    pub fn after_create(&mut self, hook: Arc<dyn PlazaAfterHook<R, P>>) -> &mut Self {
        self.after(ServiceMethodKind::Create, hook)
    }

    pub fn after_update(&mut self, hook: Arc<dyn PlazaAfterHook<R, P>>) -> &mut Self {
        self.after(ServiceMethodKind::Update, hook)
    }

    pub fn after_patch(&mut self, hook: Arc<dyn PlazaAfterHook<R, P>>) -> &mut Self {
        self.after(ServiceMethodKind::Patch, hook)
    }

    pub fn after_remove(&mut self, hook: Arc<dyn PlazaAfterHook<R, P>>) -> &mut Self {
        self.after(ServiceMethodKind::Remove, hook)
    }
}

/// All-method hooks first, then hooks registered for this method.
pub(crate) fn collect_method_hooks<H: ?Sized>(
    all: &[Arc<H>],
    by_method: &HashMap<ServiceMethodKind, Vec<Arc<H>>>,
    method: &ServiceMethodKind,
) -> Vec<Arc<H>> {
    let mut out: Vec<Arc<H>> = all.to_vec();
    if let Some(extra) = by_method.get(method) {
        out.extend(extra.iter().cloned());
    }
    out
}
