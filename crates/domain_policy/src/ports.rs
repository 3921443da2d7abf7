//! Policy Ports
//!
//! `PolicyPort` covers reading a stored policy (to pre-fill the edit form)
//! and the create/update submissions.

use async_trait::async_trait;

use core_kernel::{DomainPort, OperationMetadata, PolicyId, PortError};

use crate::record::{PolicyRecord, SubmissionReceipt};
use crate::submission::{CreatePolicyRequest, UpdatePolicyRequest};

/// Port for the backend's policy endpoints
#[async_trait]
pub trait PolicyPort: DomainPort {
    /// Retrieves a stored policy
    async fn get_policy(
        &self,
        id: PolicyId,
        metadata: Option<OperationMetadata>,
    ) -> Result<PolicyRecord, PortError>;

    /// Creates a policy from a complete draft
    async fn create_policy(
        &self,
        request: CreatePolicyRequest,
        metadata: Option<OperationMetadata>,
    ) -> Result<SubmissionReceipt, PortError>;

    /// Updates the mutable fields of a stored policy
    async fn update_policy(
        &self,
        id: PolicyId,
        request: UpdatePolicyRequest,
        metadata: Option<OperationMetadata>,
    ) -> Result<SubmissionReceipt, PortError>;
}

/// Mock implementation of PolicyPort for testing
///
/// Mimics the backend rules the console reacts to: unknown policy types are
/// rejected, and dealers without an active policy series get a warning while
/// the policy is still created. `with_rejection` makes every submission fail
/// with a fixed backend message.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::Arc;
    use tokio::sync::{Notify, RwLock};

    use core_kernel::DealerId;
    use domain_reference::PolicyTypeCode;

    /// In-memory mock implementation of PolicyPort
    #[derive(Debug, Default)]
    pub struct MockPolicyPort {
        policies: RwLock<HashMap<PolicyId, PolicyRecord>>,
        known_policy_types: Option<HashSet<PolicyTypeCode>>,
        dealers_with_series: Option<HashSet<DealerId>>,
        created: RwLock<Vec<CreatePolicyRequest>>,
        updated: RwLock<Vec<(PolicyId, UpdatePolicyRequest)>>,
        gate: Option<Arc<Notify>>,
        rejection: Option<String>,
        next_number: RwLock<u64>,
    }

    impl MockPolicyPort {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates a stored policy
        pub fn with_policy(mut self, record: PolicyRecord) -> Self {
            self.policies.get_mut().insert(record.id, record);
            self
        }

        /// Restricts accepted policy types; others fail with "policy type not found"
        pub fn with_policy_types<I, T>(mut self, codes: I) -> Self
        where
            I: IntoIterator<Item = T>,
            T: Into<PolicyTypeCode>,
        {
            self.known_policy_types = Some(codes.into_iter().map(Into::into).collect());
            self
        }

        /// Dealers that have an active policy series; others get a warning
        pub fn with_series_for(mut self, dealers: impl IntoIterator<Item = DealerId>) -> Self {
            self.dealers_with_series = Some(dealers.into_iter().collect());
            self
        }

        /// Rejects every submission with a validation error carrying `message`
        pub fn with_rejection(mut self, message: impl Into<String>) -> Self {
            self.rejection = Some(message.into());
            self
        }

        /// Makes submissions wait until the gate is notified
        pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
            self.gate = Some(gate);
            self
        }

        pub async fn created_requests(&self) -> Vec<CreatePolicyRequest> {
            self.created.read().await.clone()
        }

        pub async fn updated_requests(&self) -> Vec<(PolicyId, UpdatePolicyRequest)> {
            self.updated.read().await.clone()
        }

        async fn wait_for_gate(&self) {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
        }

        fn check_policy_type(&self, code: &PolicyTypeCode) -> Result<(), PortError> {
            if let Some(message) = &self.rejection {
                return Err(PortError::validation(message.clone()));
            }
            match &self.known_policy_types {
                Some(known) if !known.contains(code) => Err(PortError::validation_field(
                    format!("Policy type not found: {}", code),
                    "policyType",
                )),
                _ => Ok(()),
            }
        }
    }

    impl DomainPort for MockPolicyPort {}

    #[async_trait]
    impl PolicyPort for MockPolicyPort {
        async fn get_policy(
            &self,
            id: PolicyId,
            _metadata: Option<OperationMetadata>,
        ) -> Result<PolicyRecord, PortError> {
            self.policies
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Policy", id))
        }

        async fn create_policy(
            &self,
            request: CreatePolicyRequest,
            _metadata: Option<OperationMetadata>,
        ) -> Result<SubmissionReceipt, PortError> {
            self.wait_for_gate().await;
            self.created.write().await.push(request.clone());
            self.check_policy_type(&request.policy_type)?;

            let number = {
                let mut next = self.next_number.write().await;
                *next += 1;
                *next
            };
            let record = PolicyRecord {
                id: PolicyId::new_v7(),
                policy_number: Some(format!("POL-{:06}", number)),
                dealer_id: request.dealer_id,
                customer_id: request.customer_id,
                vehicle_id: request.vehicle_id,
                policy_type: request.policy_type,
                currency_id: request.currency_id,
                start_date: request.start_date,
                end_date: request.end_date,
                duration_days: request.duration_days,
                premium: request.premium,
            };
            self.policies.write().await.insert(record.id, record.clone());

            let mut receipt = SubmissionReceipt::new(record);
            if let Some(with_series) = &self.dealers_with_series {
                if !with_series.contains(&request.dealer_id) {
                    receipt = receipt.with_warning(format!(
                        "No active policy series for dealer {}; a new series will be provisioned",
                        request.dealer_id
                    ));
                }
            }
            Ok(receipt)
        }

        async fn update_policy(
            &self,
            id: PolicyId,
            request: UpdatePolicyRequest,
            _metadata: Option<OperationMetadata>,
        ) -> Result<SubmissionReceipt, PortError> {
            self.wait_for_gate().await;
            self.updated.write().await.push((id, request.clone()));
            self.check_policy_type(&request.policy_type)?;

            let mut policies = self.policies.write().await;
            let record = policies
                .get_mut(&id)
                .ok_or_else(|| PortError::not_found("Policy", id))?;
            record.policy_type = request.policy_type;
            record.start_date = request.start_date;
            record.end_date = request.end_date;
            Ok(SubmissionReceipt::new(record.clone()))
        }
    }
}
