use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

/// One profile question the advisor can ask.
///
/// The variant set is closed: a profile can never hold a key outside this
/// enumeration. Serialized under the canonical display names used by the
/// catalog columns ("Use Category", "Car Size", ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProfileField {
    #[serde(rename = "Region")]
    Region,
    #[serde(rename = "Use Category")]
    UseCategory,
    #[serde(rename = "Yearly Income")]
    YearlyIncome,
    #[serde(rename = "Credit Score")]
    CreditScore,
    #[serde(rename = "Garage Access")]
    GarageAccess,
    #[serde(rename = "Eco-Conscious")]
    EcoConscious,
    #[serde(rename = "Charging Access")]
    ChargingAccess,
    #[serde(rename = "Neighborhood Type")]
    NeighborhoodType,
    #[serde(rename = "Towing Needs")]
    TowingNeeds,
    #[serde(rename = "Safety Priority")]
    SafetyPriority,
    #[serde(rename = "Tech Features")]
    TechFeatures,
    #[serde(rename = "Car Size")]
    CarSize,
    #[serde(rename = "Ownership Recommendation")]
    OwnershipRecommendation,
    #[serde(rename = "Employment Status")]
    EmploymentStatus,
    #[serde(rename = "Travel Frequency")]
    TravelFrequency,
    #[serde(rename = "Ownership Duration")]
    OwnershipDuration,
    #[serde(rename = "Budget")]
    Budget,
    #[serde(rename = "Annual Mileage")]
    AnnualMileage,
    #[serde(rename = "Drive Type")]
    DriveType,
}

impl ProfileField {
    /// Canonical ask order for the sequential collector.
    pub const ALL: [ProfileField; 19] = [
        ProfileField::Region,
        ProfileField::UseCategory,
        ProfileField::YearlyIncome,
        ProfileField::CreditScore,
        ProfileField::GarageAccess,
        ProfileField::EcoConscious,
        ProfileField::ChargingAccess,
        ProfileField::NeighborhoodType,
        ProfileField::TowingNeeds,
        ProfileField::SafetyPriority,
        ProfileField::TechFeatures,
        ProfileField::CarSize,
        ProfileField::OwnershipRecommendation,
        ProfileField::EmploymentStatus,
        ProfileField::TravelFrequency,
        ProfileField::OwnershipDuration,
        ProfileField::Budget,
        ProfileField::AnnualMileage,
        ProfileField::DriveType,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            ProfileField::Region => "Region",
            ProfileField::UseCategory => "Use Category",
            ProfileField::YearlyIncome => "Yearly Income",
            ProfileField::CreditScore => "Credit Score",
            ProfileField::GarageAccess => "Garage Access",
            ProfileField::EcoConscious => "Eco-Conscious",
            ProfileField::ChargingAccess => "Charging Access",
            ProfileField::NeighborhoodType => "Neighborhood Type",
            ProfileField::TowingNeeds => "Towing Needs",
            ProfileField::SafetyPriority => "Safety Priority",
            ProfileField::TechFeatures => "Tech Features",
            ProfileField::CarSize => "Car Size",
            ProfileField::OwnershipRecommendation => "Ownership Recommendation",
            ProfileField::EmploymentStatus => "Employment Status",
            ProfileField::TravelFrequency => "Travel Frequency",
            ProfileField::OwnershipDuration => "Ownership Duration",
            ProfileField::Budget => "Budget",
            ProfileField::AnnualMileage => "Annual Mileage",
            ProfileField::DriveType => "Drive Type",
        }
    }

    /// Resolve a canonical display name back to a field.
    pub fn from_display_name(name: &str) -> Option<ProfileField> {
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.display_name().eq_ignore_ascii_case(name.trim()))
    }

    /// The question the advisor asks for this field.
    pub fn question(&self) -> &'static str {
        match self {
            ProfileField::Region => "Which region(s) are you in?",
            ProfileField::UseCategory => "What will you primarily use the vehicle for?",
            ProfileField::YearlyIncome => "What is your yearly income?",
            ProfileField::CreditScore => "What is your credit score?",
            ProfileField::GarageAccess => "Do you have garage access?",
            ProfileField::EcoConscious => "Are you eco-conscious?",
            ProfileField::ChargingAccess => "Do you have charging access?",
            ProfileField::NeighborhoodType => {
                "What type of neighborhood do you live in? (e.g., city, suburbs, rural)"
            }
            ProfileField::TowingNeeds => "Do you have towing needs?",
            ProfileField::SafetyPriority => "How important is safety to you?",
            ProfileField::TechFeatures => "What level of tech features do you prefer?",
            ProfileField::CarSize => "What car size do you prefer?",
            ProfileField::OwnershipRecommendation => "Are you looking to buy, lease, or rent?",
            ProfileField::EmploymentStatus => "What is your employment status?",
            ProfileField::TravelFrequency => "How often do you travel with the car?",
            ProfileField::OwnershipDuration => "How long do you plan to own or use the vehicle?",
            ProfileField::Budget => "What's your budget or price range for the vehicle?",
            ProfileField::AnnualMileage => "How many miles do you drive per year?",
            ProfileField::DriveType => "What drive type do you prefer? (e.g., AWD, FWD)",
        }
    }

    /// The catalog column this field's answer is matched against.
    ///
    /// Budget has no catalog column; it participates through the budget
    /// filter instead of substring matching.
    pub fn catalog_column(&self) -> Option<&'static str> {
        match self {
            ProfileField::Budget => None,
            field => Some(field.display_name()),
        }
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One row of the static vehicle catalog.
///
/// Loaded once per process from CSV and immutable afterwards. Columns the
/// loader does not recognize land in `extras` verbatim so the scorer can
/// still match against them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleRecord {
    pub brand: String,
    pub model: String,
    #[serde(rename = "modelYear")]
    pub model_year: i32,
    #[serde(rename = "msrpRange")]
    pub msrp_range: String,
    #[serde(rename = "msrpMin")]
    pub msrp_min: Option<f64>,
    #[serde(rename = "msrpMax")]
    pub msrp_max: Option<f64>,
    #[serde(rename = "vehicleType", default)]
    pub vehicle_type: String,
    #[serde(rename = "fuelType", default)]
    pub fuel_type: String,
    #[serde(rename = "driveType", default)]
    pub drive_type: String,
    #[serde(rename = "carSize", default)]
    pub car_size: String,
    #[serde(default)]
    pub extras: HashMap<String, String>,
}

impl VehicleRecord {
    /// Text of a catalog column by its display name, empty if absent.
    pub fn column_text(&self, column: &str) -> &str {
        match column {
            "Brand" => &self.brand,
            "Model" => &self.model,
            "MSRP Range" => &self.msrp_range,
            "Vehicle Type" => &self.vehicle_type,
            "Fuel Type" => &self.fuel_type,
            "Drive Type" => &self.drive_type,
            "Car Size" => &self.car_size,
            other => self.extras.get(other).map(String::as_str).unwrap_or(""),
        }
    }
}

/// The user's collected answers, one per field, built incrementally.
///
/// A field with a stored answer is "locked": the collector will not re-ask
/// it unless it is explicitly unlocked first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserProfile {
    answers: BTreeMap<ProfileField, String>,
}

impl UserProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an answer and lock the field.
    pub fn set(&mut self, field: ProfileField, answer: impl Into<String>) {
        self.answers.insert(field, answer.into());
    }

    pub fn get(&self, field: ProfileField) -> Option<&str> {
        self.answers.get(&field).map(String::as_str)
    }

    pub fn is_locked(&self, field: ProfileField) -> bool {
        self.answers.contains_key(&field)
    }

    /// Clear the stored answer for one field. Returns whether anything
    /// changed; a never-answered field is a no-op.
    pub fn unlock(&mut self, field: ProfileField) -> bool {
        self.answers.remove(&field).is_some()
    }

    pub fn locked_count(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ProfileField, &String)> {
        self.answers.iter()
    }

    pub fn clear(&mut self) {
        self.answers.clear();
    }
}

/// Session-scoped brand inclusion/exclusion sets.
///
/// The two sets stay disjoint: blocking a brand removes it from preferred
/// and vice versa. Brand names are compared case-insensitively.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrandFilterSet {
    blocked: BTreeSet<String>,
    preferred: BTreeSet<String>,
}

impl BrandFilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn block(&mut self, brand: &str) {
        let key = normalize_brand(brand);
        if key.is_empty() {
            return;
        }
        self.preferred.remove(&key);
        self.blocked.insert(key);
    }

    pub fn prefer(&mut self, brand: &str) {
        let key = normalize_brand(brand);
        if key.is_empty() {
            return;
        }
        self.blocked.remove(&key);
        self.preferred.insert(key);
    }

    pub fn set_blocked<I, S>(&mut self, brands: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.blocked.clear();
        for brand in brands {
            self.block(brand.as_ref());
        }
    }

    pub fn set_preferred<I, S>(&mut self, brands: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.preferred.clear();
        for brand in brands {
            self.prefer(brand.as_ref());
        }
    }

    pub fn is_blocked(&self, brand: &str) -> bool {
        self.blocked.contains(&normalize_brand(brand))
    }

    /// Whether a brand survives both sets. Blocking takes precedence; a
    /// non-empty preferred set restricts results to its members.
    pub fn allows(&self, brand: &str) -> bool {
        let key = normalize_brand(brand);
        if self.blocked.contains(&key) {
            return false;
        }
        self.preferred.is_empty() || self.preferred.contains(&key)
    }

    pub fn blocked(&self) -> impl Iterator<Item = &str> {
        self.blocked.iter().map(String::as_str)
    }

    pub fn preferred(&self) -> impl Iterator<Item = &str> {
        self.preferred.iter().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.blocked.clear();
        self.preferred.clear();
    }
}

fn normalize_brand(brand: &str) -> String {
    brand.trim().to_lowercase()
}

/// A catalog row annotated with its match score, transient matcher output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredVehicle {
    #[serde(flatten)]
    pub vehicle: VehicleRecord,
    pub score: f64,
}

/// Importance weight per profile field.
///
/// Fields absent from the table contribute nothing to a row's score.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchWeights {
    weights: HashMap<ProfileField, f64>,
}

impl MatchWeights {
    pub fn from_map(weights: HashMap<ProfileField, f64>) -> Self {
        Self { weights }
    }

    pub fn get(&self, field: ProfileField) -> Option<f64> {
        self.weights.get(&field).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ProfileField, &f64)> {
        self.weights.iter()
    }

    /// Override individual weights by display name; unknown names are
    /// ignored with a warning.
    pub fn with_overrides(mut self, overrides: &HashMap<String, f64>) -> Self {
        for (name, weight) in overrides {
            match ProfileField::from_display_name(name) {
                Some(field) => {
                    self.weights.insert(field, *weight);
                }
                None => {
                    tracing::warn!("Ignoring weight override for unknown field: {}", name);
                }
            }
        }
        self
    }
}

impl Default for MatchWeights {
    fn default() -> Self {
        let weights = HashMap::from([
            (ProfileField::Region, 1.0),
            (ProfileField::UseCategory, 1.0),
            (ProfileField::YearlyIncome, 0.6),
            (ProfileField::CreditScore, 0.6),
            (ProfileField::GarageAccess, 0.5),
            (ProfileField::EcoConscious, 0.8),
            (ProfileField::ChargingAccess, 0.8),
            (ProfileField::NeighborhoodType, 0.9),
            (ProfileField::TowingNeeds, 0.6),
            (ProfileField::SafetyPriority, 0.9),
            (ProfileField::TechFeatures, 0.8),
            (ProfileField::CarSize, 0.7),
            (ProfileField::OwnershipRecommendation, 0.7),
            (ProfileField::EmploymentStatus, 0.6),
            (ProfileField::TravelFrequency, 0.5),
            (ProfileField::OwnershipDuration, 0.5),
            (ProfileField::Budget, 2.0),
            (ProfileField::AnnualMileage, 0.6),
            (ProfileField::DriveType, 1.0),
        ]);
        Self { weights }
    }
}
