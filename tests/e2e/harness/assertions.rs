use anyhow::Result;
use roadmap_core::{RoadmapContext, TaskStatus, ValidationErrorKind};

/// Declarative assertions on roadmap state
pub enum Assertion {
    // Tasks in the most recently loaded roadmap
    TaskCount(usize),
    TaskExists(String),
    TaskStatus {
        id: String,
        status: TaskStatus,
    },
    TaskUpdatedAfterCreated(String),

    // Graph
    OrderedBefore {
        first: String,
        second: String,
    },
    NoCycle,
    CycleThrough(Vec<String>),

    // Validation of the file on disk
    RoadmapValid,
    ValidationErrors {
        kind: ValidationErrorKind,
        count: usize,
    },

    // Cache
    SameInstanceAsPrevious,
    FreshInstance,
    CacheSize(usize),
    DiskReads(u64),
    Evictions(u64),

    // Config
    ConfigName(String),
    CacheMaxSize(usize),

    // Files
    FileContentContains {
        path: String,
        content: String,
    },

    // Custom (takes mutable reference to allow mutations)
    Custom(Box<dyn Fn(&mut RoadmapContext) -> Result<()> + Send + Sync>),
}

impl std::fmt::Debug for Assertion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TaskCount(n) => write!(f, "TaskCount({})", n),
            Self::TaskExists(id) => write!(f, "TaskExists({:?})", id),
            Self::TaskStatus { id, status } => {
                write!(f, "TaskStatus {{ id: {:?}, status: {} }}", id, status)
            }
            Self::TaskUpdatedAfterCreated(id) => write!(f, "TaskUpdatedAfterCreated({:?})", id),
            Self::OrderedBefore { first, second } => {
                write!(f, "OrderedBefore {{ first: {:?}, second: {:?} }}", first, second)
            }
            Self::NoCycle => write!(f, "NoCycle"),
            Self::CycleThrough(ids) => write!(f, "CycleThrough({:?})", ids),
            Self::RoadmapValid => write!(f, "RoadmapValid"),
            Self::ValidationErrors { kind, count } => {
                write!(f, "ValidationErrors {{ kind: {}, count: {} }}", kind, count)
            }
            Self::SameInstanceAsPrevious => write!(f, "SameInstanceAsPrevious"),
            Self::FreshInstance => write!(f, "FreshInstance"),
            Self::CacheSize(n) => write!(f, "CacheSize({})", n),
            Self::DiskReads(n) => write!(f, "DiskReads({})", n),
            Self::Evictions(n) => write!(f, "Evictions({})", n),
            Self::ConfigName(name) => write!(f, "ConfigName({:?})", name),
            Self::CacheMaxSize(n) => write!(f, "CacheMaxSize({})", n),
            Self::FileContentContains { path, content } => {
                write!(f, "FileContentContains {{ path: {:?}, content: {:?} }}", path, content)
            }
            Self::Custom(_) => write!(f, "Custom(<fn>)"),
        }
    }
}
