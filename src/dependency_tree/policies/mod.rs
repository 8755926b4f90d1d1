mod exclusion_policy;

pub use exclusion_policy::ExclusionPolicy;
