// Fluxos completos contra um Postgres de verdade.
// Sem DATABASE_URL no ambiente os testes só avisam e retornam.
// Cada teste registra prestadores novos, então podem rodar juntos no mesmo banco.

use super::*;

async fn db_state() -> Option<AppState> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL ausente; pulando testes com banco.");
        return None;
    };
    let config = Config {
        database_url,
        database_max_connections: 2,
        jwt_secret: "segredo-de-teste".into(),
        jwt_expiration_hours: 1,
        server_addr: "127.0.0.1:0".into(),
    };
    let state = AppState::new(&config).await.expect("conexão com o banco");
    sqlx::migrate!().run(&state.db_pool).await.expect("migrações");
    Some(state)
}

struct Sessao {
    token: String,
    email: String,
    prestador_id: Value,
}

async fn call(
    state: &AppState,
    method: Method,
    uri: &str,
    token: &str,
    body: Value,
) -> (StatusCode, Value) {
    send(app(state.clone()), json_request(method, uri, Some(token), body)).await
}

async fn login(state: &AppState, email: &str) -> (StatusCode, Value) {
    let request = json_request(
        Method::POST,
        "/api/auth/login",
        None,
        json!({ "email": email, "senha": "senha123" }),
    );
    send(app(state.clone()), request).await
}

async fn registrar(state: &AppState) -> Sessao {
    let email = format!("dono-{}@oficina.com", Uuid::new_v4());
    let request = json_request(
        Method::POST,
        "/api/auth/registrar",
        None,
        json!({
            "prestador": {
                "tipoCadastro": "PESSOA_FISICA",
                "nome": "Oficina Teste",
                "cpf": "123.456.789-00",
                "telefone": "(11) 3333-4444",
                "emailEmpresa": "contato@oficinateste.com",
                "endereco": "Rua A, 10"
            },
            "nome": "Dono",
            "email": email,
            "senha": "senha123"
        }),
    );
    let (status, body) = send(app(state.clone()), request).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let token = body["token"].as_str().unwrap().to_string();

    let (status, me) = call(state, Method::GET, "/api/auth/me", &token, Value::Null).await;
    assert_eq!(status, StatusCode::OK, "{me}");

    Sessao {
        token,
        email,
        prestador_id: me["prestadorId"].clone(),
    }
}

async fn criar(state: &AppState, sessao: &Sessao, rota: &str, body: Value) -> Value {
    let (status, created) = call(state, Method::POST, &format!("/api/{rota}"), &sessao.token, body).await;
    assert_eq!(status, StatusCode::OK, "{created}");
    created
}

async fn criar_cliente(state: &AppState, sessao: &Sessao, nome: &str) -> Value {
    criar(
        state,
        sessao,
        "cliente",
        json!({ "nome": nome, "cpf": "123.456.789-00", "telefone": "(11) 98765-4321" }),
    )
    .await
}

async fn criar_veiculo(state: &AppState, sessao: &Sessao) -> Value {
    criar(
        state,
        sessao,
        "veiculo",
        json!({ "placa": "abc-1d23", "marca": "Fiat", "modelo": "Uno", "tipo": "CARRO" }),
    )
    .await
}

#[tokio::test]
async fn client_round_trip_strips_cpf_and_forces_tenant() {
    let Some(state) = db_state().await else { return };
    let sessao = registrar(&state).await;

    let created = criar(
        &state,
        &sessao,
        "cliente",
        json!({
            "nome": "João da Silva",
            "cpf": "123.456.789-00",
            "telefone": "(11) 98765-4321",
            "email": "joao@email.com",
            "prestadorId": Uuid::new_v4(),
            "usrCadastroDesc": "Outra pessoa"
        }),
    )
    .await;
    assert_eq!(created["cpf"], "12345678900");
    assert_eq!(created["telefone"], "11987654321");
    assert_eq!(created["prestadorId"], sessao.prestador_id);
    assert_eq!(created["usrCadastroDesc"], "Dono");

    let id = created["id"].as_str().unwrap();
    let (status, found) =
        call(&state, Method::GET, &format!("/api/cliente/{id}"), &sessao.token, Value::Null).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found, created);

    let outro = registrar(&state).await;
    let (status, _) =
        call(&state, Method::GET, &format!("/api/cliente/{id}"), &outro.token, Value::Null).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn referenced_client_cannot_be_deleted() {
    let Some(state) = db_state().await else { return };
    let sessao = registrar(&state).await;
    let cliente = criar_cliente(&state, &sessao, "Ana").await;
    let veiculo = criar_veiculo(&state, &sessao).await;
    let ordem = criar(
        &state,
        &sessao,
        "prestacaoservico",
        json!({ "clienteId": cliente["id"], "veiculoId": veiculo["id"] }),
    )
    .await;
    assert_eq!(ordem["status"], "ORCAMENTO");

    let cliente_uri = format!("/api/cliente/{}", cliente["id"].as_str().unwrap());
    let (status, body) = call(&state, Method::DELETE, &cliente_uri, &sessao.token, Value::Null).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "O registro está em uso por outro cadastro e não pode ser excluído."
    );
    let (status, _) = call(&state, Method::GET, &cliente_uri, &sessao.token, Value::Null).await;
    assert_eq!(status, StatusCode::OK);

    let ordem_uri = format!("/api/prestacaoservico/{}", ordem["id"].as_str().unwrap());
    let (status, body) = call(&state, Method::DELETE, &ordem_uri, &sessao.token, Value::Null).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mensagem"], "Deletado");
    let (status, _) = call(&state, Method::GET, &ordem_uri, &sessao.token, Value::Null).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = call(&state, Method::DELETE, &cliente_uri, &sessao.token, Value::Null).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&state, Method::DELETE, &cliente_uri, &sessao.token, Value::Null).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn disabled_record_stays_visible_with_first_stamp() {
    let Some(state) = db_state().await else { return };
    let sessao = registrar(&state).await;
    let categoria = criar(
        &state,
        &sessao,
        "categoriaservico",
        json!({ "titulo": "Funilaria", "descricao": "Lataria e pintura" }),
    )
    .await;
    let id = categoria["id"].as_str().unwrap();
    let uri = format!("/api/categoriaservico/{id}/desativar");

    let (status, primeira) = call(&state, Method::PUT, &uri, &sessao.token, Value::Null).await;
    assert_eq!(status, StatusCode::OK);
    assert!(primeira["dataDesativacao"].is_string());
    assert_eq!(primeira["usrDesativacaoDesc"], "Dono");

    let (status, segunda) = call(&state, Method::PUT, &uri, &sessao.token, Value::Null).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(segunda["dataDesativacao"], primeira["dataDesativacao"]);

    let (status, found) = call(
        &state,
        Method::GET,
        &format!("/api/categoriaservico/{id}"),
        &sessao.token,
        Value::Null,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["dataDesativacao"], primeira["dataDesativacao"]);
}

#[tokio::test]
async fn filter_is_exact_and_scoped_to_tenant() {
    let Some(state) = db_state().await else { return };
    let a = registrar(&state).await;
    let b = registrar(&state).await;
    criar_cliente(&state, &a, "Maria Souza").await;
    criar_cliente(&state, &a, "Maria").await;
    criar_cliente(&state, &b, "Maria Souza").await;

    let (status, lista) =
        call(&state, Method::GET, "/api/cliente?nome=Maria%20Souza", &a.token, Value::Null).await;
    assert_eq!(status, StatusCode::OK);
    let lista = lista.as_array().unwrap();
    assert_eq!(lista.len(), 1);
    assert_eq!(lista[0]["nome"], "Maria Souza");
    assert_eq!(lista[0]["prestadorId"], a.prestador_id);

    let (status, _) = call(&state, Method::GET, "/api/cliente?nome=Mari", &a.token, Value::Null).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, todos) = call(&state, Method::GET, "/api/cliente", &a.token, Value::Null).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(todos.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn order_cannot_point_to_another_tenant() {
    let Some(state) = db_state().await else { return };
    let a = registrar(&state).await;
    let b = registrar(&state).await;
    let cliente = criar_cliente(&state, &a, "Carlos").await;
    let veiculo = criar_veiculo(&state, &a).await;

    let (status, body) = call(
        &state,
        Method::POST,
        "/api/prestacaoservico",
        &b.token,
        json!({ "clienteId": cliente["id"], "veiculoId": veiculo["id"] }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "O registro referenciado não existe para este prestador.");
}

#[tokio::test]
async fn disabled_employee_and_provider_cannot_log_in() {
    let Some(state) = db_state().await else { return };
    let sessao = registrar(&state).await;

    let funcionario = criar(
        &state,
        &sessao,
        "funcionario",
        json!({
            "nome": "Pedro",
            "rg": "12.345.678-9",
            "cpf": "987.654.321-00",
            "endereco": "Rua B, 20",
            "cargo": "Mecânico"
        }),
    )
    .await;
    let email_funcionario = format!("pedro-{}@oficina.com", Uuid::new_v4());
    let (status, body) = call(
        &state,
        Method::POST,
        "/api/auth/funcionario",
        &sessao.token,
        json!({ "funcionarioId": funcionario["id"], "email": email_funcionario, "senha": "senha123" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["perfil"], "FUNCIONARIO");

    let (status, _) = login(&state, &email_funcionario).await;
    assert_eq!(status, StatusCode::OK);

    let uri = format!("/api/funcionario/{}/desativar", funcionario["id"].as_str().unwrap());
    let (status, _) = call(&state, Method::PUT, &uri, &sessao.token, Value::Null).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = login(&state, &email_funcionario).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Usuário desativado.");

    let (status, _) = login(&state, &sessao.email).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) =
        call(&state, Method::PUT, "/api/prestador/desativar", &sessao.token, Value::Null).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = login(&state, &sessao.email).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Usuário desativado.");
}

#[tokio::test]
async fn product_update_without_expiry_keeps_stored_date() {
    let Some(state) = db_state().await else { return };
    let sessao = registrar(&state).await;
    let produto = json!({
        "nome": "Pastilha de freio",
        "marca": "Bosch",
        "modelo": "BB-1234",
        "garantia": "90 dias",
        "valorCompra": 45.9,
        "valorVenda": 89.9
    });

    let mut com_data = produto.clone();
    com_data["dataValidade"] = json!("2030-01-31");
    let created = criar(&state, &sessao, "produto", com_data).await;
    assert_eq!(created["dataValidade"], "2030-01-31");

    let mut alteracao = produto.clone();
    alteracao["id"] = created["id"].clone();
    alteracao["nome"] = json!("Pastilha dianteira");
    let (status, updated) = call(&state, Method::PUT, "/api/produto", &sessao.token, alteracao).await;
    assert_eq!(status, StatusCode::OK, "{updated}");
    assert_eq!(updated["nome"], "Pastilha dianteira");
    assert_eq!(updated["dataValidade"], "2030-01-31");

    let sem_data = criar(&state, &sessao, "produto", produto).await;
    assert!(sem_data["dataValidade"].is_string());
}
