/// Account role. The numeric ids match the seeded `roles` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Regular,
}

impl Role {
    pub const fn id(self) -> i16 {
        match self {
            Role::Admin => 1,
            Role::Regular => 2,
        }
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            1 => Some(Role::Admin),
            2 => Some(Role::Regular),
            _ => None,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Regular => "regular",
        }
    }
}
