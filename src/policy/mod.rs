//! Process-wide security policy and its scoped provider.
//!
//! Same lifecycle as the input channel: [`ProvidePolicy::run`] installs a
//! policy for one unit of work and restores whatever was there before. With
//! no policy installed every permission is granted.

use std::fmt;
use std::sync::Arc;

use crate::core::errors::Result;
use crate::scope::slot::{RestoreGuard, Slot};

/// A named capability with an optional action list, e.g. `exit` / `"1"` or
/// `file:/etc/passwd` / `"read"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Permission {
    /// Capability name.
    pub name: String,
    /// Qualifier such as an exit code or access mode.
    pub actions: Option<String>,
}

impl Permission {
    /// A permission with no actions.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            actions: None,
        }
    }

    /// Attach an action list.
    #[must_use]
    pub fn with_actions(mut self, actions: impl Into<String>) -> Self {
        self.actions = Some(actions.into());
        self
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.actions {
            Some(actions) => write!(f, "{} ({actions})", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// Decides whether the process may exercise a permission.
pub trait SecurityPolicy: Send + Sync + fmt::Debug {
    /// Short name used in denial errors and logs.
    fn name(&self) -> &'static str;

    /// `Ok(())` to grant,
    /// [`ScopeError::PermissionDenied`](crate::ScopeError::PermissionDenied) to refuse.
    fn check_permission(&self, permission: &Permission) -> Result<()>;
}

/// Grants every permission.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl SecurityPolicy for AllowAll {
    fn name(&self) -> &'static str {
        "allow-all"
    }

    fn check_permission(&self, _permission: &Permission) -> Result<()> {
        Ok(())
    }
}

type SharedPolicy = Arc<dyn SecurityPolicy>;

static POLICY: Slot<Option<SharedPolicy>> = Slot::new("policy", None);

/// The installed policy, if any.
#[must_use]
pub fn current() -> Option<SharedPolicy> {
    POLICY.with(|slot| slot.clone())
}

/// Ask the installed policy about `permission`. Granted when none is installed.
pub fn check_permission(permission: &Permission) -> Result<()> {
    current().map_or(Ok(()), |policy| policy.check_permission(permission))
}

/// Install `policy` until the returned guard is dropped.
pub fn install(policy: SharedPolicy) -> RestoreGuard<Option<SharedPolicy>> {
    POLICY.install(Some(policy))
}

/// Makes one policy the process-wide policy for the duration of a unit of work.
#[derive(Debug, Clone)]
pub struct ProvidePolicy {
    policy: SharedPolicy,
}

impl ProvidePolicy {
    /// Provider for a freshly shared `policy`.
    pub fn new(policy: impl SecurityPolicy + 'static) -> Self {
        Self {
            policy: Arc::new(policy),
        }
    }

    /// Wrap an already shared policy, keeping its identity.
    #[must_use]
    pub fn shared(policy: SharedPolicy) -> Self {
        Self { policy }
    }

    /// The policy that [`run`](Self::run) installs.
    #[must_use]
    pub fn policy(&self) -> &SharedPolicy {
        &self.policy
    }

    /// Execute `work` with the policy installed, restoring the previous one on
    /// every exit path.
    pub fn run<R>(&self, work: impl FnOnce() -> R) -> R {
        let _restore = install(Arc::clone(&self.policy));
        work()
    }
}

/// Identity comparison for optional shared policies.
#[must_use]
pub fn same_policy(left: Option<&SharedPolicy>, right: Option<&SharedPolicy>) -> bool {
    match (left, right) {
        (Some(left), Some(right)) => Arc::ptr_eq(left, right),
        (None, None) => true,
        _ => false,
    }
}

// ──────────────────── tests ────────────────────
