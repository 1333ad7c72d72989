use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Store-assigned identifier shared by every resource.
pub type RecordId = i32;

/// An entity exposed through the generic resource handlers.
///
/// The naming constants drive both routing (`/<SINGULAR>/:id`) and every
/// client-facing message, so two resources never need their own handler code.
pub trait Resource: Serialize + Clone + Send + Sync + 'static {
    /// Body accepted by `create`.
    type Draft: DeserializeOwned + Send + Sync + 'static;

    const SINGULAR: &'static str;
    const PLURAL: &'static str;
    const LABEL: &'static str;
    /// Field the store keeps unique across all records.
    const UNIQUE_FIELD: &'static str;

    fn id(&self) -> RecordId;

    fn from_draft(id: RecordId, draft: Self::Draft) -> Self;

    fn unique_value(&self) -> &str;

    fn draft_unique_value(draft: &Self::Draft) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    pub id: RecordId,
    pub name: String,
    pub institution_id: RecordId,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlant {
    pub name: String,
    pub institution_id: RecordId,
}

impl Resource for Plant {
    type Draft = NewPlant;

    const SINGULAR: &'static str = "plant";
    const PLURAL: &'static str = "plants";
    const LABEL: &'static str = "Plant";
    const UNIQUE_FIELD: &'static str = "name";

    fn id(&self) -> RecordId {
        self.id
    }

    fn from_draft(id: RecordId, draft: NewPlant) -> Self {
        Plant {
            id,
            name: draft.name,
            institution_id: draft.institution_id,
        }
    }

    fn unique_value(&self) -> &str {
        &self.name
    }

    fn draft_unique_value(draft: &NewPlant) -> &str {
        &draft.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Institution {
    pub id: RecordId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewInstitution {
    pub name: String,
}

impl Resource for Institution {
    type Draft = NewInstitution;

    const SINGULAR: &'static str = "institution";
    const PLURAL: &'static str = "institutions";
    const LABEL: &'static str = "Institution";
    const UNIQUE_FIELD: &'static str = "name";

    fn id(&self) -> RecordId {
        self.id
    }

    fn from_draft(id: RecordId, draft: NewInstitution) -> Self {
        Institution {
            id,
            name: draft.name,
        }
    }

    fn unique_value(&self) -> &str {
        &self.name
    }

    fn draft_unique_value(draft: &NewInstitution) -> &str {
        &draft.name
    }
}
