//! Testes das projeções de estoque: status derivado do saldo e cálculo do
//! novo saldo em ingressos e saídas.

use proptest::prelude::*;
use rust_decimal::Decimal;

use erp_pyme_backend::models::inventory::{
    MovementType, StockStatus, next_stock_balance, stock_status,
};

fn dec(n: i64) -> Decimal {
    Decimal::from(n)
}

// --- Status do saldo ---

#[test]
fn status_critico_quando_saldo_nao_supera_o_minimo() {
    assert_eq!(stock_status(dec(0), dec(5), dec(10)), StockStatus::Critico);
    assert_eq!(stock_status(dec(5), dec(5), dec(10)), StockStatus::Critico);
}

#[test]
fn status_alerta_entre_minimo_e_ponto_de_reposicao() {
    assert_eq!(stock_status(dec(6), dec(5), dec(10)), StockStatus::Alerta);
    assert_eq!(stock_status(dec(10), dec(5), dec(10)), StockStatus::Alerta);
}

#[test]
fn status_ok_acima_do_ponto_de_reposicao() {
    assert_eq!(stock_status(dec(11), dec(5), dec(10)), StockStatus::Ok);
}

#[test]
fn limites_sao_inclusivos() {
    // exatamente no mínimo é CRITICO, não ALERTA
    assert_eq!(stock_status(dec(5), dec(5), dec(5)), StockStatus::Critico);
}

// --- Novo saldo ---

#[test]
fn ingresso_sem_saldo_previo_parte_de_zero() {
    assert_eq!(
        next_stock_balance(None, MovementType::Ingreso, dec(7)),
        Ok(dec(7))
    );
}

#[test]
fn ingresso_soma_ao_saldo_existente() {
    assert_eq!(
        next_stock_balance(Some(dec(3)), MovementType::Ingreso, dec(7)),
        Ok(dec(10))
    );
}

#[test]
fn saida_sem_linha_de_saldo_falha() {
    let err = next_stock_balance(None, MovementType::Salida, dec(1)).unwrap_err();
    assert_eq!(err.disponible, None);
}

#[test]
fn saida_maior_que_o_saldo_informa_o_disponivel() {
    let err = next_stock_balance(Some(dec(4)), MovementType::Salida, dec(5)).unwrap_err();
    assert_eq!(err.disponible, Some(dec(4)));
}

#[test]
fn saida_igual_ao_saldo_zera_sem_erro() {
    assert_eq!(
        next_stock_balance(Some(dec(5)), MovementType::Salida, dec(5)),
        Ok(dec(0))
    );
}

// --- Propriedades ---

fn qty_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000, 0u32..1000u32)
        .prop_map(|(units, mils)| Decimal::from(units) + Decimal::new(mils as i64, 3))
}

proptest! {
    // O saldo resultante jamais é negativo, qualquer que seja a combinação
    // de saldo atual e quantidade movimentada.
    #[test]
    fn saldo_nunca_fica_negativo(
        current in proptest::option::of(qty_strategy()),
        quantity in qty_strategy(),
        salida in any::<bool>(),
    ) {
        let movement = if salida { MovementType::Salida } else { MovementType::Ingreso };
        if let Ok(new_balance) = next_stock_balance(current, movement, quantity) {
            prop_assert!(new_balance >= Decimal::ZERO);
        }
    }

    // Ingresso seguido de saída da mesma quantidade devolve o saldo original.
    #[test]
    fn ingresso_e_saida_se_cancelam(
        start in qty_strategy(),
        quantity in qty_strategy(),
    ) {
        let after_in = next_stock_balance(Some(start), MovementType::Ingreso, quantity).unwrap();
        let after_out = next_stock_balance(Some(after_in), MovementType::Salida, quantity).unwrap();
        prop_assert_eq!(after_out, start);
    }

    // Uma saída só falha quando a quantidade supera o saldo.
    #[test]
    fn saida_falha_exatamente_quando_falta_saldo(
        current in qty_strategy(),
        quantity in qty_strategy(),
    ) {
        let result = next_stock_balance(Some(current), MovementType::Salida, quantity);
        prop_assert_eq!(result.is_err(), current < quantity);
    }
}
