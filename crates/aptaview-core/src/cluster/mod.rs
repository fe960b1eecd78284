//! Cluster analyses and the aggregated family table derived from
//! them.

pub mod gateway;
pub mod model;
pub mod table;

pub use gateway::ClustersGateway;
pub use model::{
    AptaClusterConfiguration, ClusterAnalysis, active_analysis, default_lsh_dimension,
    sort_newest_first,
};
pub use table::{
    CLUSTER_PAGE_SIZE, CLUSTER_PAGE_SIZE_OPTIONS, ClusterSort, ClusterSortColumn, ClusterTableRow,
    cluster_table_rows, members_of,
};
