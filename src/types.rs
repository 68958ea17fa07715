/// A row of `aks_nodes`.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: i64,
    pub name: String,
    pub status: String,
    pub kubelet_version: String,
}

/// A row of `aks_pods`.
#[derive(Debug, Clone, PartialEq)]
pub struct Pod {
    pub id: i64,
    pub name: String,
    pub namespace: String,
    pub status: String,
}

/// Insert payload for `aks_nodes`; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNode {
    pub name: String,
    pub status: String,
    pub kubelet_version: String,
}

/// Insert payload for `aks_pods`; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPod {
    pub name: String,
    pub namespace: String,
    pub status: String,
}

/// The three autoscale fields as typed, before the CPU value is validated.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleRequest {
    pub deployment: String,
    pub namespace: String,
    pub cpu: String,
}
