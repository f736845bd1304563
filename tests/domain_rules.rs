//! Regras soltas de domínio: códigos de produto, papéis e validação
//! condicional do cadastro de clientes.

use erp_pyme_backend::middleware::rbac::{
    PermAjuste, PermClientesGestionar, PermComprasAprobar, PermComprasValidar, PermissionDef,
};
use erp_pyme_backend::models::auth::Role;
use erp_pyme_backend::models::catalog::CURRENCIES;
use erp_pyme_backend::models::clients::{ClientKind, CreateClientPayload};
use erp_pyme_backend::models::products::product_code;

// --- Código sequencial do produto ---

#[test]
fn codigo_do_produto_tem_seis_digitos_com_zeros() {
    assert_eq!(product_code(1), "PROD-000001");
    assert_eq!(product_code(52), "PROD-000052");
    assert_eq!(product_code(999_999), "PROD-999999");
}

#[test]
fn codigo_do_produto_nao_trunca_ids_grandes() {
    assert_eq!(product_code(1_234_567), "PROD-1234567");
}

// --- Papéis ---

#[test]
fn so_perfis_corporativos_escolhem_sucursal() {
    assert!(Role::Ceo.puede_elegir_sucursal());
    assert!(Role::AdministradorGeneral.puede_elegir_sucursal());
    assert!(Role::Logistica.puede_elegir_sucursal());
    assert!(!Role::Contador.puede_elegir_sucursal());
    assert!(!Role::AdminSuc.puede_elegir_sucursal());
    assert!(!Role::Almacen.puede_elegir_sucursal());
    assert!(!Role::Ventas.puede_elegir_sucursal());
}

#[test]
fn contador_valida_mas_nao_aprova() {
    assert!(PermComprasValidar::roles().contains(&Role::Contador));
    assert!(!PermComprasAprobar::roles().contains(&Role::Contador));
}

#[test]
fn perfis_de_loja_ajustam_estoque_mas_nao_gerenciam_clientes() {
    for role in [Role::AdminSuc, Role::Almacen] {
        assert!(PermAjuste::roles().contains(&role));
        assert!(!PermClientesGestionar::roles().contains(&role));
    }
}

// --- Cadastro de clientes ---

fn base_payload(kind: ClientKind) -> CreateClientPayload {
    CreateClientPayload {
        kind,
        doc_type: "DNI".to_string(),
        doc_number: "12345678".to_string(),
        first_name: None,
        paternal_surname: None,
        maternal_surname: None,
        business_name: None,
        trade_name: None,
        email: None,
        phone: None,
        address: None,
        country: None,
        department: None,
        province: None,
        district: None,
        zip_code: None,
    }
}

#[test]
fn pessoa_natural_exige_nome_e_sobrenome_paterno() {
    let mut payload = base_payload(ClientKind::Natural);
    assert!(!payload.nombre_valido());

    payload.first_name = Some("María".to_string());
    assert!(!payload.nombre_valido());

    payload.paternal_surname = Some("Quispe".to_string());
    assert!(payload.nombre_valido());
}

#[test]
fn empresa_juridica_exige_razao_social() {
    let mut payload = base_payload(ClientKind::Juridica);
    payload.first_name = Some("María".to_string());
    payload.paternal_surname = Some("Quispe".to_string());
    assert!(!payload.nombre_valido());

    payload.business_name = Some("Comercial Andina SAC".to_string());
    assert!(payload.nombre_valido());
}

#[test]
fn nome_so_com_espacos_nao_conta() {
    let mut payload = base_payload(ClientKind::Juridica);
    payload.business_name = Some("   ".to_string());
    assert!(!payload.nombre_valido());
}

// --- Moedas ---

#[test]
fn moedas_fixas_do_sistema() {
    let codes: Vec<&str> = CURRENCIES.iter().map(|c| c.code).collect();
    assert_eq!(codes, vec!["PEN", "USD"]);
}
