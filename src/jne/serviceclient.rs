use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::LogLevel;
use crate::jne::entity::{Entity, EntityList};
use crate::jne::error::Error;
use crate::jne::parse::{EntityParser, Payload};
use crate::jne::registry;

/// Production Plataforma Electoral host.
pub const DEFAULT_BASE_URL: &str = "https://plataformaelectoral.jne.gob.pe";

const MAX_ERROR_BODY: usize = 2000;

/// API operations and the payload each one returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ElectoralDistricts,
    ElectionProcesses,
    ElectionTypesByProcess,
    Files,
    FilesOnList,
    File,
    CandidatesByList,
    Resume,
}

impl Operation {
    pub const ALL: [Operation; 8] = [
        Operation::ElectoralDistricts,
        Operation::ElectionProcesses,
        Operation::ElectionTypesByProcess,
        Operation::Files,
        Operation::FilesOnList,
        Operation::File,
        Operation::CandidatesByList,
        Operation::Resume,
    ];

    /// Registry name of the payload this operation returns.
    pub const fn payload_type(self) -> &'static str {
        match self {
            Operation::ElectoralDistricts => "electoral_district",
            Operation::ElectionProcesses => "election_process",
            Operation::ElectionTypesByProcess => "election_type",
            Operation::Files | Operation::FilesOnList => "file",
            Operation::File => "file_extended",
            Operation::CandidatesByList => "candidate",
            Operation::Resume => "resume",
        }
    }

    /// True if `data` is an array.
    pub const fn payload_list(self) -> bool {
        !matches!(self, Operation::File | Operation::Resume)
    }
}

/// Filters for the advanced file search. Zero means "any".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSearch {
    pub electoral_jury: i64,
    pub political_organization: i64,
    pub election_process: i64,
    pub file_type: i64,
    pub ubigeo: String,
}

impl Default for FileSearch {
    fn default() -> Self {
        FileSearch {
            electoral_jury: 0,
            political_organization: 0,
            election_process: 0,
            file_type: 0,
            ubigeo: "000000".to_string(),
        }
    }
}

impl FileSearch {
    pub fn with_electoral_jury(mut self, id: i64) -> Self {
        self.electoral_jury = id;
        self
    }

    pub fn with_political_organization(mut self, id: i64) -> Self {
        self.political_organization = id;
        self
    }

    pub fn with_election_process(mut self, id: i64) -> Self {
        self.election_process = id;
        self
    }

    pub fn with_file_type(mut self, id: i64) -> Self {
        self.file_type = id;
        self
    }

    pub fn with_ubigeo(mut self, ubigeo: &str) -> Self {
        self.ubigeo = ubigeo.to_string();
        self
    }

    fn form(&self) -> Vec<(&'static str, String)> {
        vec![
            ("idJuradoElectoral", self.electoral_jury.to_string()),
            ("idOrganizacionPolitica", self.political_organization.to_string()),
            ("idProcesoElectoral", self.election_process.to_string()),
            ("idTipoExpediente", self.file_type.to_string()),
            ("strUbigeo", self.ubigeo.clone()),
        ]
    }
}

enum Method {
    Get,
    Post(Vec<(&'static str, String)>),
}

/// HTTP client for Plataforma Electoral operations.
pub struct ServiceClient {
    client: Client,
    base_url: String,
    log_level: LogLevel,
    parser: EntityParser,
}

impl Default for ServiceClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, LogLevel::default())
    }
}

impl ServiceClient {
    /// Create a new client for the given base URL.
    pub fn new(base_url: &str, log_level: LogLevel) -> Self {
        Self::with_client(Client::new(), base_url, log_level)
    }

    /// Create a client on top of a preconfigured `reqwest::Client`.
    pub fn with_client(client: Client, base_url: &str, log_level: LogLevel) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            log_level,
            parser: EntityParser::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Departments available as electoral districts.
    ///
    /// Not every district is listed; for instance Peruvians residing abroad
    /// (140101) are missing.
    pub async fn get_electoral_districts(&self) -> Result<EntityList, Error> {
        self.request_list(
            Method::Get,
            "/Candidato/ListUbigeoDepartamento",
            Operation::ElectoralDistricts,
        )
        .await
    }

    /// All election processes.
    pub async fn get_election_processes(&self) -> Result<EntityList, Error> {
        self.request_list(
            Method::Get,
            "/Resoluciones/GetListProcesosCR",
            Operation::ElectionProcesses,
        )
        .await
    }

    /// Election types held within an election process.
    pub async fn get_election_types_by_process(
        &self,
        election_process: i64,
    ) -> Result<EntityList, Error> {
        let path = format!("/Candidato/GetTipoEleccionbyProceso/{}", election_process);
        self.request_list(Method::Get, &path, Operation::ElectionTypesByProcess)
            .await
    }

    /// Advanced file search.
    pub async fn get_files(&self, search: &FileSearch) -> Result<EntityList, Error> {
        self.request_list(
            Method::Post(search.form()),
            "/Expediente/BusquedaReporteAvanzadoExpediente",
            Operation::Files,
        )
        .await
    }

    /// Candidate-list files of a process and election type. A zero district means all.
    pub async fn get_files_on_list(
        &self,
        election_process: i64,
        election_type: i64,
        electoral_jury: i64,
        electoral_district: i64,
    ) -> Result<EntityList, Error> {
        let district = if electoral_district == 0 {
            "null".to_string()
        } else {
            electoral_district.to_string()
        };
        let path = format!(
            "/Candidato/GetExpedientesLista/{}-{}-{}------{}-",
            election_process, election_type, district, electoral_jury
        );
        self.request_list(Method::Get, &path, Operation::FilesOnList)
            .await
    }

    /// A file with its documents, candidates and related files.
    pub async fn get_file(&self, file_code: &str) -> Result<Option<Entity>, Error> {
        let form = vec![("strNumExpedienteFiltro", file_code.to_string())];
        self.request_entity(Method::Post(form), "/Expediente/BuscandoCodigo", Operation::File)
            .await
    }

    /// Candidates registered on a list.
    pub async fn get_candidates_by_list(
        &self,
        election_process: i64,
        election_type: i64,
        request_id: i64,
        file_id: i64,
    ) -> Result<EntityList, Error> {
        let path = format!(
            "/Candidato/GetCandidatos/{}-{}-{}-{}",
            election_type, election_process, request_id, file_id
        );
        self.request_list(Method::Get, &path, Operation::CandidatesByList)
            .await
    }

    /// Consolidated resume (hoja de vida) of a candidate.
    pub async fn get_resume(
        &self,
        resume_id: i64,
        election_process: i64,
        political_organization: i64,
    ) -> Result<Option<Entity>, Error> {
        let param = format!(
            "{}-0-{}-{}",
            resume_id, political_organization, election_process
        );
        let mut path = "/HojaVida/GetHVConsolidado".to_string();
        path.push_str("?param=");
        path.push_str(&urlencoding::encode(&param));
        self.request_entity(Method::Get, &path, Operation::Resume)
            .await
    }

    async fn request_list(
        &self,
        method: Method,
        path: &str,
        operation: Operation,
    ) -> Result<EntityList, Error> {
        let kind = registry::resolve(operation.payload_type())?;
        let payload = self.request(method, path, operation).await?;
        Ok(payload
            .and_then(Payload::into_list)
            .unwrap_or_else(|| EntityList::new(kind)))
    }

    async fn request_entity(
        &self,
        method: Method,
        path: &str,
        operation: Operation,
    ) -> Result<Option<Entity>, Error> {
        let payload = self.request(method, path, operation).await?;
        Ok(payload.and_then(Payload::into_entity))
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        operation: Operation,
    ) -> Result<Option<Payload>, Error> {
        let url = format!("{}{}", self.base_url, path);

        if matches!(self.log_level, LogLevel::Debug) {
            log::debug!("Url: {:?}", url);
            log::debug!("Payload type: {}", operation.payload_type());
        }

        let builder = match method {
            Method::Get => self.client.get(&url),
            Method::Post(form) => self.client.post(&url).form(&form),
        };

        let resp = builder
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                log::error!("Request failed: {e}");
                Error::Request(e.to_string())
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            log::error!("Failed to read response body: {e}");
            Error::Request(e.to_string())
        })?;

        if status != StatusCode::OK {
            let body = truncate_body(&body);
            log::error!("JNE API error ({}): {}", status, body);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let json: Value = serde_json::from_str(&body).map_err(|e| {
            log::error!("Failed to parse JSON: {e} | body: {}", truncate_body(&body));
            Error::Decode(e.to_string())
        })?;

        self.parser.parse(
            &json,
            Some(operation.payload_type()),
            operation.payload_list(),
        )
    }
}

fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...[truncated]", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_operation_has_a_registered_payload() {
        let names = Operation::ALL.iter().map(|op| op.payload_type());
        assert!(registry::ensure_registered(names).is_ok());
    }

    #[test]
    fn only_file_and_resume_are_single_objects() {
        let singles: Vec<Operation> = Operation::ALL
            .into_iter()
            .filter(|op| !op.payload_list())
            .collect();
        assert_eq!(singles, vec![Operation::File, Operation::Resume]);
    }

    #[test]
    fn file_search_defaults_to_any() {
        let form = FileSearch::default().with_election_process(110).form();
        assert_eq!(
            form,
            vec![
                ("idJuradoElectoral", "0".to_string()),
                ("idOrganizacionPolitica", "0".to_string()),
                ("idProcesoElectoral", "110".to_string()),
                ("idTipoExpediente", "0".to_string()),
                ("strUbigeo", "000000".to_string()),
            ]
        );
    }

    #[test]
    fn base_url_drops_trailing_slash() {
        let client = ServiceClient::new("http://localhost:8080/", LogLevel::Debug);
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(ServiceClient::default().base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let body = "ñ".repeat(MAX_ERROR_BODY);
        let truncated = truncate_body(&body);
        assert!(truncated.ends_with("...[truncated]"));
        assert!(truncated.len() <= MAX_ERROR_BODY + "...[truncated]".len());
        assert_eq!(truncate_body("short"), "short");
    }
}
