//! Port implementations over the REST contract
//!
//! | Port operation            | Endpoint                        |
//! |---------------------------|---------------------------------|
//! | `list_dealers`            | `GET /dealers`                  |
//! | `list_customers`          | `GET /customers?dealerId=`      |
//! | `list_vehicles`           | `GET /vehicles/customer/{id}`   |
//! | `list_policy_types`       | `GET /policy-types`             |
//! | `list_currencies`         | `GET /currencies`               |
//! | `create_vehicle`          | `POST /vehicles`                |
//! | `calculate_price`         | `POST /pricing/calculate`       |
//! | `get_policy`              | `GET /policies/{id}`            |
//! | `create_policy`           | `POST /policies`                |
//! | `update_policy`           | `PUT /policies/{id}`            |

use async_trait::async_trait;

use core_kernel::{CustomerId, DealerId, OperationMetadata, PolicyId, PortError};
use domain_policy::{
    CreatePolicyRequest, PolicyPort, PolicyRecord, SubmissionReceipt, UpdatePolicyRequest,
};
use domain_pricing::{CalculatedPrice, PriceCalculationRequest, PricingPort};
use domain_reference::{
    CurrencyOption, Customer, Dealer, LookupPort, NewVehicle, PolicyType, Vehicle,
};

use crate::adapter::BrokerHttpAdapter;
use crate::dto::{PolicyResponseDto, PriceResponseDto};

#[async_trait]
impl LookupPort for BrokerHttpAdapter {
    async fn list_dealers(
        &self,
        metadata: Option<OperationMetadata>,
    ) -> Result<Vec<Dealer>, PortError> {
        self.get("dealers", "Dealer", &[], metadata.as_ref()).await
    }

    async fn list_customers(
        &self,
        dealer_id: DealerId,
        metadata: Option<OperationMetadata>,
    ) -> Result<Vec<Customer>, PortError> {
        let query = [("dealerId", dealer_id.as_uuid().to_string())];
        self.get("customers", "Customer", &query, metadata.as_ref()).await
    }

    async fn list_vehicles(
        &self,
        customer_id: CustomerId,
        metadata: Option<OperationMetadata>,
    ) -> Result<Vec<Vehicle>, PortError> {
        let path = format!("vehicles/customer/{}", customer_id.as_uuid());
        self.get(&path, "Vehicle", &[], metadata.as_ref()).await
    }

    async fn list_policy_types(
        &self,
        metadata: Option<OperationMetadata>,
    ) -> Result<Vec<PolicyType>, PortError> {
        self.get("policy-types", "PolicyType", &[], metadata.as_ref()).await
    }

    async fn list_currencies(
        &self,
        metadata: Option<OperationMetadata>,
    ) -> Result<Vec<CurrencyOption>, PortError> {
        self.get("currencies", "Currency", &[], metadata.as_ref()).await
    }

    async fn create_vehicle(
        &self,
        request: NewVehicle,
        metadata: Option<OperationMetadata>,
    ) -> Result<Vehicle, PortError> {
        tracing::info!(customer_id = %request.customer_id, plate = %request.plate_number, "registering vehicle");
        self.post("vehicles", "Vehicle", &request, metadata.as_ref()).await
    }
}

#[async_trait]
impl PricingPort for BrokerHttpAdapter {
    async fn calculate_price(
        &self,
        request: PriceCalculationRequest,
        metadata: Option<OperationMetadata>,
    ) -> Result<CalculatedPrice, PortError> {
        let dto: PriceResponseDto = self
            .post("pricing/calculate", "PriceList", &request, metadata.as_ref())
            .await?;
        CalculatedPrice::try_from(dto)
    }
}

#[async_trait]
impl PolicyPort for BrokerHttpAdapter {
    async fn get_policy(
        &self,
        id: PolicyId,
        metadata: Option<OperationMetadata>,
    ) -> Result<PolicyRecord, PortError> {
        let path = format!("policies/{}", id.as_uuid());
        self.get(&path, "Policy", &[], metadata.as_ref()).await
    }

    async fn create_policy(
        &self,
        request: CreatePolicyRequest,
        metadata: Option<OperationMetadata>,
    ) -> Result<SubmissionReceipt, PortError> {
        let dto: PolicyResponseDto = self
            .post("policies", "Policy", &request, metadata.as_ref())
            .await?;
        Ok(dto.into())
    }

    async fn update_policy(
        &self,
        id: PolicyId,
        request: UpdatePolicyRequest,
        metadata: Option<OperationMetadata>,
    ) -> Result<SubmissionReceipt, PortError> {
        let path = format!("policies/{}", id.as_uuid());
        let dto: PolicyResponseDto = self
            .put(&path, "Policy", &request, metadata.as_ref())
            .await?;
        Ok(dto.into())
    }
}
