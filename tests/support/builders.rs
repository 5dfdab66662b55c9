// tests/support/builders.rs
use super::mocks::fixed_now;
use super::helpers::ADMIN_ID;
use identity_backoffice::application::dto::{CreateGroupCommand, CreateOrganizationCommand};
use identity_backoffice::domain::entity::AuditStamp;
use identity_backoffice::domain::group::{Group, GroupId, GroupName};
use identity_backoffice::domain::organization::{
    Address, Organization, OrganizationId, OrganizationName, OrganizationSlug,
};
use identity_backoffice::domain::user::UserId;
use uuid::Uuid;

pub struct GroupBuilder {
    id: GroupId,
    organization_id: OrganizationId,
    parent_id: Option<GroupId>,
    name: String,
    description: Option<String>,
    active: bool,
    members: Vec<Uuid>,
}

impl GroupBuilder {
    pub fn new(organization_id: OrganizationId, name: &str) -> Self {
        Self {
            id: GroupId::generate(),
            organization_id,
            parent_id: None,
            name: name.into(),
            description: None,
            active: true,
            members: Vec::new(),
        }
    }

    pub fn id(mut self, id: GroupId) -> Self {
        self.id = id;
        self
    }

    pub fn parent(mut self, parent_id: GroupId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn members(mut self, members: &[Uuid]) -> Self {
        self.members = members.to_vec();
        self
    }

    pub fn build(self) -> Group {
        let mut group = Group {
            id: self.id,
            organization_id: self.organization_id,
            parent_id: self.parent_id,
            name: GroupName::new(self.name).unwrap(),
            description: self.description,
            owner_id: Some(UserId::new(ADMIN_ID).unwrap()),
            members: Vec::new(),
            members_replaced: false,
            active: self.active,
            stamp: AuditStamp::new(fixed_now()),
        };
        group.replace_members(
            self.members.into_iter().map(|m| UserId::new(m).unwrap()),
            fixed_now(),
        );
        group
    }
}

pub fn organization(name: &str, slug: &str) -> Organization {
    Organization {
        id: OrganizationId::generate(),
        slug: OrganizationSlug::new(slug).unwrap(),
        name: OrganizationName::new(name).unwrap(),
        address: Address {
            city: Some("Lisbon".into()),
            country: Some("PT".into()),
            ..Address::default()
        },
        owner_id: Some(UserId::new(ADMIN_ID).unwrap()),
        groups: Vec::new(),
        active: true,
        stamp: AuditStamp::new(fixed_now()),
    }
}

pub fn create_group(organization_id: OrganizationId, name: &str) -> CreateGroupCommand {
    CreateGroupCommand {
        organization_id,
        parent_id: None,
        name: name.into(),
        description: None,
        owner_id: Some(ADMIN_ID),
        active: true,
        members: Vec::new(),
    }
}

pub fn create_organization(name: &str) -> CreateOrganizationCommand {
    CreateOrganizationCommand {
        name: name.into(),
        slug: None,
        address: Address::default(),
        owner_id: Some(ADMIN_ID),
        active: true,
    }
}
