// src/docs.rs

use utoipa::openapi::{
    content::ContentBuilder,
    path::{OperationBuilder, ParameterBuilder, ParameterIn, PathItem},
    request_body::RequestBodyBuilder,
    response::{ResponseBuilder, ResponsesBuilder},
    schema::{Array, KnownFormat, ObjectBuilder, Schema, SchemaFormat, Type},
    security::{HttpAuthScheme, HttpBuilder, SecurityRequirement, SecurityScheme},
    Ref, RefOr, Required,
};
use utoipa::{IntoParams, OpenApi, ToSchema};

use crate::handlers;
use crate::models;
use crate::models::{
    categoria_servico::CategoriaServico, cliente::Cliente, funcionario::FuncionarioPrestador,
    prestacao_servico::PrestacaoServico, produto::Produto, servico::Servico, veiculo::Veiculo,
};
use crate::services::crud::CrudResource;

#[derive(OpenApi)]
#[openapi(
    info(title = "Smart Oficina API", description = "Cadastros da oficina mecânica"),
    paths(
        // --- Auth ---
        handlers::auth::registrar,
        handlers::auth::login,
        handlers::auth::me,
        handlers::auth::criar_funcionario,

        // --- Prestador ---
        handlers::prestador::get_prestador,
        handlers::prestador::update_prestador,
        handlers::prestador::disable_prestador,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Perfil,
            models::auth::UsuarioDto,
            models::auth::RegistrarPrestadorPayload,
            models::auth::LoginPayload,
            models::auth::CriarFuncionarioLoginPayload,
            models::auth::TokenResponse,

            // --- Prestador ---
            models::prestador::TipoCadastro,
            models::prestador::PrestadorDto,

            // --- Cadastros ---
            models::auditoria::AuditoriaDto,
            models::cliente::ClienteDto,
            models::veiculo::VeiculoTipo,
            models::veiculo::VeiculoDto,
            models::produto::ProdutoDto,
            models::funcionario::FuncionarioPrestadorDto,
            models::categoria_servico::CategoriaServicoDto,
            models::prestacao_servico::PrestacaoServicoStatus,
            models::prestacao_servico::PrestacaoServicoDto,
            models::servico::ServicoDto,
        )
    ),
    tags(
        (name = "Auth", description = "Registro, login e usuários"),
        (name = "Prestador", description = "Dados do prestador (tenant)"),
        (name = "Cliente", description = "Clientes da oficina"),
        (name = "Veiculo", description = "Veículos atendidos"),
        (name = "Produto", description = "Produtos e peças"),
        (name = "Funcionario", description = "Funcionários do prestador"),
        (name = "CategoriaServico", description = "Categorias de serviço"),
        (name = "PrestacaoServico", description = "Ordens de serviço"),
        (name = "Servico", description = "Itens das ordens de serviço")
    ),
    modifiers(&SecurityAddon, &CrudDocs)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

// Os handlers genéricos não aceitam `#[utoipa::path]`; as seis operações de
// cada cadastro são registradas aqui a partir do `CrudResource`.
struct CrudDocs;

impl utoipa::Modify for CrudDocs {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        register::<Cliente>(openapi);
        register::<Veiculo>(openapi);
        register::<Produto>(openapi);
        register::<FuncionarioPrestador>(openapi);
        register::<CategoriaServico>(openapi);
        register::<PrestacaoServico>(openapi);
        register::<Servico>(openapi);
    }
}

fn json_content(schema: impl Into<RefOr<Schema>>) -> utoipa::openapi::content::Content {
    ContentBuilder::new().schema(Some(schema)).build()
}

// utoipa só descreve `Uuid` dentro das derives; aqui o schema é montado à mão.
fn id_param() -> utoipa::openapi::path::Parameter {
    let uuid = ObjectBuilder::new()
        .schema_type(Type::String)
        .format(Some(SchemaFormat::KnownFormat(KnownFormat::Uuid)))
        .build();
    ParameterBuilder::new()
        .name("id")
        .parameter_in(ParameterIn::Path)
        .required(Required::True)
        .schema(Some(Schema::Object(uuid)))
        .build()
}

fn operation<R: CrudResource>(
    acao: &str,
    summary: String,
    ok: utoipa::openapi::Response,
) -> OperationBuilder {
    let mut responses = ResponsesBuilder::new()
        .response("200", ok)
        .response("401", ResponseBuilder::new().description("Token ausente ou inválido").build());
    if acao != "create" {
        responses = responses.response(
            "204",
            ResponseBuilder::new().description("Nenhum registro encontrado").build(),
        );
    }
    let bad_request = if matches!(acao, "create" | "update" | "delete") {
        "Dados inválidos ou violação de restrição"
    } else {
        "Id ou filtro inválido"
    };
    responses = responses.response("400", ResponseBuilder::new().description(bad_request).build());
    if R::OWNER_ONLY_WRITE && acao != "list" && acao != "get" {
        responses = responses.response(
            "403",
            ResponseBuilder::new().description("Apenas o prestador pode alterar").build(),
        );
    }

    OperationBuilder::new()
        .tag(R::TAG)
        .operation_id(Some(format!("{}_{}", acao, R::ROUTE)))
        .summary(Some(summary))
        .responses(responses.build())
        .security(SecurityRequirement::new("api_jwt", Vec::<String>::new()))
}

fn register<R: CrudResource>(openapi: &mut utoipa::openapi::OpenApi) {
    let dto = <R::Dto as ToSchema>::name().to_string();
    let base = format!("/api/{}", R::ROUTE);

    let body = RequestBodyBuilder::new()
        .content("application/json", json_content(Ref::from_schema_name(dto.clone())))
        .required(Some(Required::True))
        .build();
    let one = || {
        ResponseBuilder::new()
            .description(format!("{} encontrado", R::TAG))
            .content("application/json", json_content(Ref::from_schema_name(dto.clone())))
            .build()
    };
    let many = ResponseBuilder::new()
        .description(format!("Lista de {}", R::TAG))
        .content(
            "application/json",
            json_content(Schema::Array(Array::new(Ref::from_schema_name(dto.clone())))),
        )
        .build();

    let create = operation::<R>("create", format!("Cadastrar {}", R::TAG), one())
        .request_body(Some(body.clone()))
        .build();
    let list = operation::<R>("list", format!("Listar {} com filtros opcionais", R::TAG), many)
        .parameters(Some(<R::Filter as IntoParams>::into_params(|| Some(ParameterIn::Query))))
        .build();
    let update = operation::<R>("update", format!("Alterar {} (id no corpo)", R::TAG), one())
        .request_body(Some(body))
        .build();
    let get = operation::<R>("get", format!("Buscar {} por id", R::TAG), one())
        .parameter(id_param())
        .build();
    let deleted = ResponseBuilder::new().description("Registro excluído").build();
    let delete = operation::<R>("delete", format!("Excluir {}", R::TAG), deleted)
        .parameter(id_param())
        .build();
    let disable = operation::<R>("disable", format!("Desativar {}", R::TAG), one())
        .parameter(id_param())
        .build();

    let collection = openapi.paths.paths.entry(base.clone()).or_insert_with(PathItem::default);
    collection.post = Some(create);
    collection.get = Some(list);
    collection.put = Some(update);

    let item = openapi.paths.paths.entry(format!("{base}/{{id}}")).or_insert_with(PathItem::default);
    item.get = Some(get);
    item.delete = Some(delete);

    let desativar = openapi
        .paths
        .paths
        .entry(format!("{base}/{{id}}/desativar"))
        .or_insert_with(PathItem::default);
    desativar.put = Some(disable);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_crud_resource_has_its_paths() {
        let doc = ApiDoc::openapi();
        for route in [
            "cliente",
            "veiculo",
            "produto",
            "funcionario",
            "categoriaservico",
            "prestacaoservico",
            "servico",
        ] {
            let base = format!("/api/{route}");
            let collection = doc.paths.paths.get(&base).expect("rota base");
            assert!(collection.post.is_some() && collection.get.is_some() && collection.put.is_some());
            let item = doc.paths.paths.get(&format!("{base}/{{id}}")).expect("rota por id");
            assert!(item.get.is_some() && item.delete.is_some());
            assert!(doc.paths.paths.contains_key(&format!("{base}/{{id}}/desativar")));
        }
    }

    #[test]
    fn list_operation_documents_filters() {
        let doc = ApiDoc::openapi();
        let list = doc.paths.paths["/api/cliente"].get.as_ref().unwrap();
        let names: Vec<_> = list
            .parameters
            .as_ref()
            .unwrap()
            .iter()
            .map(|p| p.name.clone())
            .collect();
        assert_eq!(names, vec!["cpf", "nome", "email"]);
    }

    #[test]
    fn id_path_parameter_is_a_uuid_string() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let params = &doc["paths"]["/api/veiculo/{id}"]["get"]["parameters"];
        assert_eq!(params[0]["name"], "id");
        assert_eq!(params[0]["in"], "path");
        assert_eq!(params[0]["schema"]["type"], "string");
        assert_eq!(params[0]["schema"]["format"], "uuid");
    }

    #[test]
    fn jwt_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("api_jwt"));
        assert!(components.schemas.contains_key("ClienteDto"));
    }
}
