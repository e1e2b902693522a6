/// Capability lookup consumed by the mutation workflows.
pub trait Capabilities: Send + Sync {
    fn has_perm(&self, name: &str) -> bool;
}

pub const ALL_PERMISSIONS: &str = "all_permissions";
pub const PERM_WHITELIST: &str = "players.whitelist";
pub const PERM_BAN: &str = "players.ban";
pub const PERM_WARN: &str = "players.warn";

/// Static permission set of the signed-in admin.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminPerms {
    pub is_master: bool,
    pub permissions: Vec<String>,
}

impl AdminPerms {
    pub fn new(permissions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            is_master: false,
            permissions: permissions.into_iter().map(Into::into).collect(),
        }
    }

    pub fn master() -> Self {
        Self {
            is_master: true,
            permissions: Vec::new(),
        }
    }
}

impl Capabilities for AdminPerms {
    fn has_perm(&self, name: &str) -> bool {
        self.is_master
            || self
                .permissions
                .iter()
                .any(|p| p == ALL_PERMISSIONS || p == name)
    }
}

impl<F> Capabilities for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn has_perm(&self, name: &str) -> bool {
        self(name)
    }
}
