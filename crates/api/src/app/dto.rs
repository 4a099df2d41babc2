use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToWalletRequest {
    pub org_type: String,
    pub private_key_file_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterCompanyRequest {
    pub org_type: String,
    #[serde(rename = "companyCRN")]
    pub company_crn: String,
    pub company_name: String,
    pub location: String,
    pub organisation_role: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewCompanyRequest {
    pub org_type: String,
    #[serde(rename = "companyCRN")]
    pub company_crn: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddDrugRequest {
    pub org_type: String,
    pub drug_name: String,
    pub serial_no: String,
    pub mfg_date: String,
    pub exp_date: String,
    #[serde(rename = "companyCRN")]
    pub company_crn: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrugRequest {
    pub org_type: String,
    pub drug_name: String,
    pub serial_no: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetailDrugRequest {
    pub org_type: String,
    pub drug_name: String,
    pub serial_no: String,
    #[serde(rename = "retailerCRN")]
    pub retailer_crn: String,
    pub customer_aadhar: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePoRequest {
    pub org_type: String,
    #[serde(rename = "buyerCRN")]
    pub buyer_crn: String,
    #[serde(rename = "sellerCRN")]
    pub seller_crn: String,
    pub drug_name: String,
    pub quantity: Scalar,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShipmentRequest {
    pub org_type: String,
    #[serde(rename = "buyerCRN")]
    pub buyer_crn: String,
    pub drug_name: String,
    pub list_of_assets: AssetList,
    #[serde(rename = "transporterCRN")]
    pub transporter_crn: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShipmentRequest {
    pub org_type: String,
    #[serde(rename = "buyerCRN")]
    pub buyer_crn: String,
    pub drug_name: String,
    #[serde(rename = "transporterCRN")]
    pub transporter_crn: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewShipmentRequest {
    pub org_type: String,
    #[serde(rename = "buyerCRN")]
    pub buyer_crn: String,
    pub drug_name: String,
}

/// A string argument that clients may also send as a JSON number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(serde_json::Number),
}

impl Scalar {
    pub fn into_arg(self) -> String {
        match self {
            Scalar::Text(s) => s,
            Scalar::Number(n) => n.to_string(),
        }
    }
}

/// `listOfAssets`: a JSON array of serials or the raw string form.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AssetList {
    Items(Vec<String>),
    Raw(String),
}

impl AssetList {
    /// Argument form passed to chaincode (JSON array text or the raw list).
    pub fn into_arg(self) -> String {
        match self {
            AssetList::Items(items) => serde_json::Value::from(items).to_string(),
            AssetList::Raw(raw) => raw,
        }
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

pub fn success(message: impl Into<String>, data: Option<serde_json::Value>) -> axum::response::Response {
    (
        StatusCode::OK,
        axum::Json(SuccessResponse {
            status: "success",
            message: message.into(),
            data,
        }),
    )
        .into_response()
}
