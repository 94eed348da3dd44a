use serde::{Deserialize, Serialize};

/// Language tag supplied alongside the extracted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Hi,
    Unknown,
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Language::En => write!(f, "en"),
            Language::Hi => write!(f, "hi"),
            Language::Unknown => write!(f, "unknown"),
        }
    }
}

/// A normalized contract, ready for segmentation. Never mutated once built.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub id: String,
    pub text: String,
    pub language: Language,
}

/// Byte range `[start, end)` into [`Document::text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    NonCompete,
    NonSolicitation,
    Indemnity,
    LimitationOfLiability,
    Termination,
    Confidentiality,
    IntellectualProperty,
    Compensation,
    Payment,
    Rent,
    SecurityDeposit,
    ServiceLevels,
    ProfitSharing,
    Supply,
    DisputeResolution,
    GoverningLaw,
    Other,
}

impl Category {
    pub const ALL: [Category; 17] = [
        Category::NonCompete,
        Category::NonSolicitation,
        Category::Indemnity,
        Category::LimitationOfLiability,
        Category::Termination,
        Category::Confidentiality,
        Category::IntellectualProperty,
        Category::Compensation,
        Category::Payment,
        Category::Rent,
        Category::SecurityDeposit,
        Category::ServiceLevels,
        Category::ProfitSharing,
        Category::Supply,
        Category::DisputeResolution,
        Category::GoverningLaw,
        Category::Other,
    ];

    /// Snake-case key used in rule files and rule identifiers.
    pub fn key(&self) -> &'static str {
        match self {
            Category::NonCompete => "non_compete",
            Category::NonSolicitation => "non_solicitation",
            Category::Indemnity => "indemnity",
            Category::LimitationOfLiability => "limitation_of_liability",
            Category::Termination => "termination",
            Category::Confidentiality => "confidentiality",
            Category::IntellectualProperty => "intellectual_property",
            Category::Compensation => "compensation",
            Category::Payment => "payment",
            Category::Rent => "rent",
            Category::SecurityDeposit => "security_deposit",
            Category::ServiceLevels => "service_levels",
            Category::ProfitSharing => "profit_sharing",
            Category::Supply => "supply",
            Category::DisputeResolution => "dispute_resolution",
            Category::GoverningLaw => "governing_law",
            Category::Other => "other",
        }
    }

    /// Lower-case phrase used inside explanation sentences.
    pub fn phrase(&self) -> &'static str {
        match self {
            Category::NonCompete => "non-compete",
            Category::NonSolicitation => "non-solicitation",
            Category::Indemnity => "indemnity",
            Category::LimitationOfLiability => "limitation of liability",
            Category::Termination => "termination",
            Category::Confidentiality => "confidentiality",
            Category::IntellectualProperty => "intellectual property",
            Category::Compensation => "compensation",
            Category::Payment => "payment",
            Category::Rent => "rent",
            Category::SecurityDeposit => "security deposit",
            Category::ServiceLevels => "service level",
            Category::ProfitSharing => "profit sharing",
            Category::Supply => "supply",
            Category::DisputeResolution => "dispute resolution",
            Category::GoverningLaw => "governing law",
            Category::Other => "general",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::NonCompete => write!(f, "Non-Compete"),
            Category::NonSolicitation => write!(f, "Non-Solicitation"),
            Category::Indemnity => write!(f, "Indemnity"),
            Category::LimitationOfLiability => write!(f, "Limitation of Liability"),
            Category::Termination => write!(f, "Termination"),
            Category::Confidentiality => write!(f, "Confidentiality"),
            Category::IntellectualProperty => write!(f, "Intellectual Property"),
            Category::Compensation => write!(f, "Compensation"),
            Category::Payment => write!(f, "Payment"),
            Category::Rent => write!(f, "Rent"),
            Category::SecurityDeposit => write!(f, "Security Deposit"),
            Category::ServiceLevels => write!(f, "Service Levels"),
            Category::ProfitSharing => write!(f, "Profit Sharing"),
            Category::Supply => write!(f, "Supply"),
            Category::DisputeResolution => write!(f, "Dispute Resolution"),
            Category::GoverningLaw => write!(f, "Governing Law"),
            Category::Other => write!(f, "Other"),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.key() == s.trim())
            .ok_or_else(|| format!("unknown category `{}`", s))
    }
}

/// Ordinal clause severity. Ordering is `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Medium => write!(f, "Medium"),
            RiskLevel::High => write!(f, "High"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractType {
    Employment,
    Service,
    Lease,
    Partnership,
    Vendor,
    /// No clause voted for a specific type.
    General,
}

impl std::fmt::Display for ContractType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContractType::Employment => write!(f, "Employment"),
            ContractType::Service => write!(f, "Service"),
            ContractType::Lease => write!(f, "Lease"),
            ContractType::Partnership => write!(f, "Partnership"),
            ContractType::Vendor => write!(f, "Vendor"),
            ContractType::General => write!(f, "General"),
        }
    }
}

/// A rule match backing a classification or a risk assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub rule_id: String,
    /// Exact substring of the clause text that the rule matched.
    pub matched: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<RiskLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Clause {
    pub index: usize,
    pub span: Span,
    pub text: String,
    pub category: Option<Category>,
    pub contract_type_vote: Option<ContractType>,
    pub confidence: f32,
    pub category_evidence: Option<Evidence>,
    pub risk: Option<RiskLevel>,
    pub evidence: Vec<Evidence>,
    pub explanation: String,
    pub suggestion: Option<String>,
}

impl Clause {
    /// Category, treating an unclassified clause as [`Category::Other`].
    pub fn category_or_other(&self) -> Category {
        self.category.unwrap_or(Category::Other)
    }

    /// Risk level, treating an unscored clause as [`RiskLevel::Low`].
    pub fn risk_or_low(&self) -> RiskLevel {
        self.risk.unwrap_or(RiskLevel::Low)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallScore {
    /// Weighted mean of clause severities.
    pub value: f64,
    pub band: RiskLevel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractTypeVote {
    pub contract_type: ContractType,
    pub votes: u32,
}

/// Parties, amounts and forum details pulled from the whole document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KeyFacts {
    /// `(role, name)` pairs in document order.
    pub parties: Vec<(String, String)>,
    pub amounts: Vec<String>,
    pub governing_law: Option<String>,
    pub jurisdiction: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContractAssessment {
    pub document_id: String,
    pub language: Language,
    pub contract_type: ContractType,
    /// Vote totals in order of first appearance.
    pub contract_type_votes: Vec<ContractTypeVote>,
    pub score: OverallScore,
    pub clauses: Vec<Clause>,
    pub explanation: String,
    pub facts: KeyFacts,
}

impl ContractAssessment {
    pub fn count_at(&self, level: RiskLevel) -> usize {
        self.clauses
            .iter()
            .filter(|c| c.risk_or_low() == level)
            .count()
    }
}
