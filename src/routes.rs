// src/routes.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::AppState,
    docs::ApiDoc,
    handlers::{self, crud},
    middleware::auth::auth_guard,
    models::{
        categoria_servico::CategoriaServico, cliente::Cliente, funcionario::FuncionarioPrestador,
        prestacao_servico::PrestacaoServico, produto::Produto, servico::Servico, veiculo::Veiculo,
    },
    services::crud::CrudResource,
};

// As seis rotas de um cadastro, aninhadas em `/api/{R::ROUTE}`.
fn rotas_crud<R: CrudResource>() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(crud::create::<R>)
                .get(crud::list::<R>)
                .put(crud::update::<R>),
        )
        .route("/{id}", get(crud::get_by_id::<R>).delete(crud::delete::<R>))
        .route("/{id}/desativar", put(crud::disable::<R>))
}

fn nest_crud<R: CrudResource>(router: Router<AppState>) -> Router<AppState> {
    router.nest(&format!("/api/{}", R::ROUTE), rotas_crud::<R>())
}

pub fn app(app_state: AppState) -> Router {
    // Rotas públicas
    let auth_routes = Router::new()
        .route("/registrar", post(handlers::auth::registrar))
        .route("/login", post(handlers::auth::login));

    // Tudo abaixo exige Bearer válido
    let mut protegidas = Router::new()
        .route("/api/auth/me", get(handlers::auth::me))
        .route("/api/auth/funcionario", post(handlers::auth::criar_funcionario))
        .route(
            "/api/prestador",
            get(handlers::prestador::get_prestador).put(handlers::prestador::update_prestador),
        )
        .route("/api/prestador/desativar", put(handlers::prestador::disable_prestador));

    protegidas = nest_crud::<Cliente>(protegidas);
    protegidas = nest_crud::<Veiculo>(protegidas);
    protegidas = nest_crud::<Produto>(protegidas);
    protegidas = nest_crud::<FuncionarioPrestador>(protegidas);
    protegidas = nest_crud::<CategoriaServico>(protegidas);
    protegidas = nest_crud::<PrestacaoServico>(protegidas);
    protegidas = nest_crud::<Servico>(protegidas);

    let protegidas = protegidas.route_layer(axum_middleware::from_fn_with_state(
        app_state.clone(),
        auth_guard,
    ));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .merge(protegidas)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
