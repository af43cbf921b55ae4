use uuid::Uuid;

use crate::domain::{Member, RoleId};

/// Who is asking, and on which site. Built once per request by the auth
/// middleware.
#[derive(Debug, Clone)]
pub struct MemberContext {
    pub site_id: Uuid,
    pub member: Option<Member>,
}

impl MemberContext {
    pub fn anonymous(site_id: Uuid) -> Self {
        Self {
            site_id,
            member: None,
        }
    }

    pub fn authenticated(site_id: Uuid, member: Member) -> Self {
        Self {
            site_id,
            member: Some(member),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.member.is_some()
    }

    pub fn member_id(&self) -> Option<Uuid> {
        self.member.as_ref().map(|m| m.id)
    }

    pub fn is_suspended(&self) -> bool {
        self.member.as_ref().is_some_and(Member::is_suspended)
    }

    pub fn is_admin(&self) -> bool {
        self.member
            .as_ref()
            .is_some_and(|m| m.roles.iter().any(|r| r.as_str() == RoleId::ADMIN))
    }

    /// Stored roles plus the implicit `All` and, when signed in, `Registered`
    pub fn effective_roles(&self) -> Vec<RoleId> {
        let mut roles = vec![RoleId::all()];
        if let Some(member) = &self.member {
            roles.push(RoleId::registered());
            for role in &member.roles {
                if !roles.contains(role) {
                    roles.push(role.clone());
                }
            }
        }
        roles
    }

    /// Name used in log events
    pub fn display_name(&self) -> &str {
        self.member
            .as_ref()
            .map(|m| m.display_name.as_str())
            .unwrap_or("anonymous")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MemberStatus;

    fn member(roles: &[&str]) -> Member {
        Member {
            id: Uuid::new_v4(),
            site_id: Uuid::new_v4(),
            display_name: "alice".to_string(),
            roles: roles.iter().map(|r| RoleId::from(*r)).collect(),
            status: MemberStatus::Active,
        }
    }

    #[test]
    fn anonymous_holds_only_all() {
        let ctx = MemberContext::anonymous(Uuid::new_v4());
        assert_eq!(ctx.effective_roles(), vec![RoleId::all()]);
        assert!(!ctx.is_suspended());
        assert_eq!(ctx.display_name(), "anonymous");
    }

    #[test]
    fn member_gains_registered_without_duplicates() {
        let m = member(&["Moderator", "All"]);
        let ctx = MemberContext::authenticated(m.site_id, m);
        assert_eq!(
            ctx.effective_roles(),
            vec![RoleId::all(), RoleId::registered(), RoleId::from("Moderator")]
        );
    }

    #[test]
    fn detects_admin_role() {
        let m = member(&["Admin"]);
        assert!(MemberContext::authenticated(m.site_id, m).is_admin());
    }
}
