//! Components - the purchasable parts a variant is priced from.

use super::SofaType;
use std::fmt;

/// Closed set of component categories. The discriminant is the legacy
/// numeric code some stored documents still carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    /// Frame
    Fusto = 0,
    /// Foam
    Gomma = 1,
    /// Net / spring base
    Rete = 2,
    /// Mattress
    Materasso = 3,
    /// Upholstery labour
    Tappezzeria = 4,
    /// Backrest iron
    FerroSchienale = 5,
    /// Cushion filling
    ImbottituraCuscinetti = 6,
    /// Feet
    Piedini = 7,
    /// Hardware
    Ferramenta = 8,
    /// Miscellaneous
    Varie = 9,
    /// Packaging
    Imballo = 10,
    /// Box
    Scatola = 11,
    /// Branded fabric
    TessutoBrand = 12,
    /// Transport
    Trasporto = 13,
}

impl ComponentType {
    /// Every component type, ordered by code.
    pub const ALL: [Self; 14] = [
        Self::Fusto,
        Self::Gomma,
        Self::Rete,
        Self::Materasso,
        Self::Tappezzeria,
        Self::FerroSchienale,
        Self::ImbottituraCuscinetti,
        Self::Piedini,
        Self::Ferramenta,
        Self::Varie,
        Self::Imballo,
        Self::Scatola,
        Self::TessutoBrand,
        Self::Trasporto,
    ];

    /// Canonical stored key, e.g. `FUSTO`.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Fusto => "FUSTO",
            Self::Gomma => "GOMMA",
            Self::Rete => "RETE",
            Self::Materasso => "MATERASSO",
            Self::Tappezzeria => "TAPPEZZERIA",
            Self::FerroSchienale => "FERRO_SCHIENALE",
            Self::ImbottituraCuscinetti => "IMBOTTITURA_CUSCINETTI",
            Self::Piedini => "PIEDINI",
            Self::Ferramenta => "FERRAMENTA",
            Self::Varie => "VARIE",
            Self::Imballo => "IMBALLO",
            Self::Scatola => "SCATOLA",
            Self::TessutoBrand => "TESSUTO_BRAND",
            Self::Trasporto => "TRASPORTO",
        }
    }

    /// Legacy numeric code (position in the enumeration).
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Looks up a type by its legacy numeric code.
    #[must_use]
    pub fn from_code(code: u64) -> Option<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
    }

    /// Case-insensitive key match, ignoring surrounding whitespace.
    #[must_use]
    pub fn from_str_loose(s: &str) -> Option<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.key().eq_ignore_ascii_case(wanted))
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Identity used to group and remove components inside a variant: the id when
/// the component has one, otherwise its name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ComponentKey {
    /// Catalog id
    Id(i64),
    /// Display name, for components without an id
    Name(String),
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "#{id}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// A priced part. Variants own their components by value; repeating a
/// component in a variant's list is how quantity is expressed.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    /// Catalog id, absent for ad-hoc or legacy entries
    pub id: Option<i64>,
    /// Display name
    pub name: String,
    /// Unit price
    pub price: f64,
    /// Supplier this part is bought from
    pub supplier_id: Option<i64>,
    /// Category, `None` when unknown
    pub component_type: Option<ComponentType>,
    /// Sofa type this part is specific to
    pub sofa_type: Option<SofaType>,
    /// Free-text label for the sofa type association
    pub sofa_type_label: Option<String>,
}

impl Component {
    /// Creates an untyped component with only a name and a price.
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            id: None,
            name: name.into(),
            price,
            supplier_id: None,
            component_type: None,
            sofa_type: None,
            sofa_type_label: None,
        }
    }

    /// Sets the catalog id.
    #[must_use]
    pub const fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the component type.
    #[must_use]
    pub const fn with_type(mut self, component_type: ComponentType) -> Self {
        self.component_type = Some(component_type);
        self
    }

    /// Sets the supplier.
    #[must_use]
    pub const fn with_supplier(mut self, supplier_id: i64) -> Self {
        self.supplier_id = Some(supplier_id);
        self
    }

    /// Sets the sofa type association.
    #[must_use]
    pub const fn with_sofa_type(mut self, sofa_type: SofaType) -> Self {
        self.sofa_type = Some(sofa_type);
        self
    }

    /// Identity key: id if present, else name.
    #[must_use]
    pub fn key(&self) -> ComponentKey {
        self.id
            .map_or_else(|| ComponentKey::Name(self.name.clone()), ComponentKey::Id)
    }

    /// True if this component has the given identity key.
    #[must_use]
    pub fn has_key(&self, key: &ComponentKey) -> bool {
        match (key, self.id) {
            (ComponentKey::Id(wanted), Some(id)) => *wanted == id,
            (ComponentKey::Name(wanted), None) => *wanted == self.name,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_follow_declaration_order() {
        for (idx, t) in ComponentType::ALL.into_iter().enumerate() {
            assert_eq!(usize::from(t.code()), idx);
            assert_eq!(ComponentType::from_code(idx as u64), Some(t));
        }
        assert_eq!(ComponentType::from_code(14), None);
        assert_eq!(ComponentType::from_code(u64::MAX), None);
    }

    #[test]
    fn test_key_lookup_is_case_insensitive() {
        assert_eq!(
            ComponentType::from_str_loose("fusto"),
            Some(ComponentType::Fusto)
        );
        assert_eq!(
            ComponentType::from_str_loose("Ferro_Schienale"),
            Some(ComponentType::FerroSchienale)
        );
        assert_eq!(ComponentType::from_str_loose("bogus"), None);
    }

    #[test]
    fn test_key_prefers_id_over_name() {
        let with_id = Component::new("Frame", 10.0).with_id(4);
        let without_id = Component::new("Frame", 10.0);

        assert_eq!(with_id.key(), ComponentKey::Id(4));
        assert_eq!(without_id.key(), ComponentKey::Name("Frame".to_string()));
        assert!(with_id.has_key(&ComponentKey::Id(4)));
        assert!(!with_id.has_key(&ComponentKey::Name("Frame".to_string())));
        assert!(without_id.has_key(&ComponentKey::Name("Frame".to_string())));
    }
}
