//! Testes da máquina de estados das solicitudes de compra e das regras
//! puras da etapa de execução (faturas e vouchers).

use erp_pyme_backend::models::purchases::{
    DocumentStatus, RequestStatus, VoucherDisposition, motivo_rechazo_valido, voucher_disposition,
};

const ALL_STATUSES: [RequestStatus; 6] = [
    RequestStatus::Pendiente,
    RequestStatus::Aprobado,
    RequestStatus::Rechazado,
    RequestStatus::CompraRealizada,
    RequestStatus::Completado,
    RequestStatus::Validada,
];

// --- Máquina de estados ---

#[test]
fn somente_pendiente_aceita_decisao_e_edicao() {
    for status in ALL_STATUSES {
        let esperado = status == RequestStatus::Pendiente;
        assert_eq!(status.can_decide(), esperado, "can_decide em {status}");
        assert_eq!(status.can_edit(), esperado, "can_edit em {status}");
    }
}

#[test]
fn estados_terminais_nao_aceitam_nenhuma_operacao() {
    for status in [RequestStatus::Rechazado, RequestStatus::Validada] {
        assert!(status.is_terminal());
        assert!(!status.can_edit());
        assert!(!status.can_decide());
        assert!(!status.can_register_execution());
        assert!(!status.can_complete());
        assert!(!status.can_receive());
        assert!(!status.can_close());
    }
}

#[test]
fn execucao_exige_aprovacao_previa() {
    assert!(!RequestStatus::Pendiente.can_register_execution());
    assert!(RequestStatus::Aprobado.can_register_execution());
    assert!(RequestStatus::CompraRealizada.can_register_execution());
    assert!(RequestStatus::Completado.can_register_execution());
    assert!(!RequestStatus::Validada.can_register_execution());
}

#[test]
fn recepcao_segue_os_mesmos_estados_da_execucao() {
    for status in ALL_STATUSES {
        assert_eq!(status.can_receive(), status.can_register_execution());
    }
}

#[test]
fn completar_parte_de_aprobado_ou_compra_realizada() {
    for status in ALL_STATUSES {
        let esperado =
            matches!(status, RequestStatus::Aprobado | RequestStatus::CompraRealizada);
        assert_eq!(status.can_complete(), esperado, "can_complete em {status}");
    }
}

#[test]
fn validacao_final_exige_compra_registrada() {
    assert!(!RequestStatus::Pendiente.can_close());
    assert!(!RequestStatus::Aprobado.can_close());
    assert!(RequestStatus::CompraRealizada.can_close());
    assert!(RequestStatus::Completado.can_close());
    assert!(!RequestStatus::Validada.can_close());
}

// Percorre o caminho feliz inteiro: PENDIENTE -> APROBADO ->
// COMPRA REALIZADA -> COMPLETADO(opcional) -> VALIDADA.
#[test]
fn caminho_feliz_completo() {
    let mut status = RequestStatus::Pendiente;

    assert!(status.can_decide());
    status = RequestStatus::Aprobado;

    assert!(status.can_register_execution());
    status = RequestStatus::CompraRealizada;

    assert!(status.can_receive());
    assert!(status.can_close());
    status = RequestStatus::Validada;

    assert!(status.is_terminal());
}

#[test]
fn rotulos_dos_estados_batem_com_o_banco() {
    assert_eq!(RequestStatus::CompraRealizada.as_str(), "COMPRA REALIZADA");
    assert_eq!(RequestStatus::Pendiente.to_string(), "PENDIENTE");
    assert_eq!(RequestStatus::Validada.to_string(), "VALIDADA");
}

// --- Gate de fechamento por documento ---

// Fatura rechazada segue travando a VALIDADA tanto quanto uma pendente:
// só some do caminho quando for corrigida e revisada como VALIDADO.
#[test]
fn so_documentos_validados_liberam_o_fechamento() {
    assert!(DocumentStatus::Pendiente.bloquea_cierre());
    assert!(DocumentStatus::Rechazado.bloquea_cierre());
    assert!(!DocumentStatus::Validado.bloquea_cierre());
}

// --- Motivo de rechazo ---

#[test]
fn motivo_de_rechazo_exige_cinco_caracteres_uteis() {
    assert!(!motivo_rechazo_valido(""));
    assert!(!motivo_rechazo_valido("    "));
    assert!(!motivo_rechazo_valido("abc"));
    assert!(!motivo_rechazo_valido("  abcd  "));
    assert!(motivo_rechazo_valido("abcde"));
    assert!(motivo_rechazo_valido("  precio muy alto  "));
}

#[test]
fn motivo_de_rechazo_conta_caracteres_e_nao_bytes() {
    // "ñañañ" tem 5 chars mas mais de 5 bytes
    assert!(motivo_rechazo_valido("ñañañ"));
}

// --- Dedup de vouchers ---

#[test]
fn voucher_inedito_e_inserido() {
    assert_eq!(voucher_disposition(10, None), VoucherDisposition::Nueva);
}

#[test]
fn voucher_reenviado_na_mesma_fatura_e_pulado() {
    assert_eq!(voucher_disposition(10, Some(10)), VoucherDisposition::Duplicada);
}

#[test]
fn voucher_usado_em_outra_fatura_conflita() {
    assert_eq!(voucher_disposition(10, Some(99)), VoucherDisposition::Conflicto);
}
